pub mod github;
pub mod redmine;
