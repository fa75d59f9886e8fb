use super::Example;

/// Built-in natural-language to Git pairs, grouped by topic.
///
/// Order matters: the prompt keeps only the tail of the combined corpus, so
/// the pairs nearest the end are the ones the model sees when no context file
/// is loaded.
const BUILT_IN: &[(&str, &str)] = &[
    // Basic workflow
    ("check repository status", "git status"),
    ("add all changes", "git add ."),
    ("add specific file app.js", "git add app.js"),
    ("commit changes with message update README", "git commit -m \"update README\""),
    ("add and commit in one line with message fix", "git commit -am \"fix\""),
    ("amend last commit message to better explanation", "git commit --amend -m \"better explanation\""),
    ("push current branch", "git push"),
    ("push to origin main", "git push origin main"),
    ("pull latest changes", "git pull"),
    ("pull with rebase", "git pull --rebase"),
    // Branching
    ("create new branch dev-feature", "git checkout -b dev-feature"),
    ("switch to dev branch", "git checkout dev"),
    ("delete local branch dev", "git branch -d dev"),
    ("delete remote branch dev", "git push origin --delete dev"),
    ("list all branches", "git branch"),
    ("list remote branches", "git branch -r"),
    ("rename current branch to hotfix", "git branch -m hotfix"),
    // Time based
    ("go back to commit that was done 6 hours back", "git reset --hard HEAD@{6.hours.ago}"),
    ("reset to 3 hours ago", "git reset --hard HEAD@{3.hours.ago}"),
    ("checkout to 2 hours ago", "git checkout HEAD@{2.hours.ago}"),
    ("find commits from last 2 days", "git log --since=\"2 days ago\" --oneline"),
    ("show changes from yesterday", "git log --since=\"yesterday\" --oneline"),
    ("go back to commit made this morning", "git log --since=\"today 00:00\" --oneline"),
    ("reset to last week", "git reset --hard HEAD@{1.week.ago}"),
    ("show commits from 4 hours ago", "git log --since=\"4 hours ago\" --oneline"),
    // Commit counts
    ("go back 3 commits", "git reset --hard HEAD~3"),
    ("checkout 5 commits back", "git checkout HEAD~5"),
    ("go back 3 commits but keep changes", "git reset --soft HEAD~3"),
    ("undo last commit but keep changes", "git reset --soft HEAD~1"),
    ("undo last commit and discard changes", "git reset --hard HEAD~1"),
    ("undo last 2 commits but keep files", "git reset --soft HEAD~2"),
    // Interactive rebase
    ("squash last 3 commits into one", "git rebase -i HEAD~3"),
    ("interactive rebase last 5 commits", "git rebase -i HEAD~5"),
    ("edit last commit", "git rebase -i HEAD~1"),
    // Staging then committing
    ("commit all changes with message fix bugs", "git add .\ngit commit -m \"fix bugs\""),
    ("stage and commit with message added feature", "git add .\ngit commit -m \"added feature\""),
    // Force pushes
    ("force push safely", "git push --force-with-lease"),
    ("force push to origin main", "git push --force-with-lease origin main"),
    // Merging and rebasing
    ("merge dev into current branch", "git merge dev"),
    ("rebase current branch onto main", "git rebase main"),
    ("abort merge", "git merge --abort"),
    ("abort rebase", "git rebase --abort"),
    // History
    ("show commit history", "git log --oneline"),
    ("show last 10 commits", "git log -10 --oneline"),
    ("show commits by author", "git log --author=\"<author>\" --oneline"),
    ("search commits by message", "git log --grep=\"<search>\" --oneline"),
    // Stash
    ("stash changes", "git stash"),
    ("apply last stash", "git stash pop"),
    ("list all stashes", "git stash list"),
    // Remotes
    ("fetch latest changes", "git fetch"),
    ("sync with remote", "git fetch origin\ngit reset --hard origin/main"),
];

pub fn built_in() -> Vec<Example> {
    BUILT_IN
        .iter()
        .map(|(user, bot)| Example::new(*user, *bot))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_built_in_answer_is_git() {
        for example in built_in() {
            for line in example.command.lines() {
                assert!(line.starts_with("git "), "not a git line: {line}");
            }
        }
    }

    #[test]
    fn corpus_is_larger_than_the_window() {
        assert!(built_in().len() > crate::prompt::EXAMPLE_WINDOW);
    }
}
