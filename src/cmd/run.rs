use tracing::info;

use crate::config::Settings;
use crate::error::AppResult;
use crate::infra::github::GithubFeed;
use crate::infra::redmine::RedmineClient;
use crate::workflow::bridge::Bridge;
use crate::workflow::close::StatusCloser;

#[derive(Debug, Clone, Default)]
pub struct RunCommandArgs {
    pub once: bool,
}

pub async fn run(settings: &Settings, args: RunCommandArgs) -> AppResult<()> {
    let feed = GithubFeed::new(settings)?;
    let closer = StatusCloser::new(RedmineClient::new(settings), settings);
    let mut bridge = Bridge::new(feed, closer, settings);

    info!(
        repo = %settings.github_repo,
        redmine = %settings.redmine_base_url,
        "watching for closed pull requests"
    );

    if args.once {
        bridge.run_until(|_| true).await;
    } else {
        bridge.run_forever().await;
    }
    Ok(())
}
