mod handler;
mod model;

pub use handler::get_repo_count;
pub use model::RepoCountPage;
