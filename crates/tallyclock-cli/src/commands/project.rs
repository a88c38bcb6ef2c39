use std::path::Path;

use clap::Subcommand;
use tallyclock_core::ProjectEvent;

use super::common::{parse_datetime, CliResult, Session};

#[derive(Subcommand)]
pub enum ProjectAction {
    /// A project was created
    Add {
        /// Project title
        title: String,
        /// RFC 3339 deadline
        deadline: String,
        /// Project id (generated when omitted)
        #[arg(long)]
        id: Option<String>,
    },
    /// One or more projects were deleted
    Delete {
        /// Project ids
        #[arg(required = true)]
        ids: Vec<String>,
    },
}

pub async fn run(action: ProjectAction, path: Option<&Path>) -> CliResult {
    let session = Session::open(path).await?;

    match action {
        ProjectAction::Add {
            title,
            deadline,
            id,
        } => {
            let project = ProjectEvent {
                id: id.unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
                title,
                deadline: parse_datetime(&deadline)?,
            };
            session.engine.on_project_added(&project).await?;
        }
        ProjectAction::Delete { ids } => match ids.as_slice() {
            [id] => session.engine.on_project_deleted(id).await,
            _ => session.engine.on_projects_deleted(&ids).await,
        },
    }

    session.finish().await
}
