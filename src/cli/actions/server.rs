use crate::cli::{actions::Action, globals::GlobalArgs};
use crate::partecipa::new;
use anyhow::Result;

/// Handle the server action
pub async fn handle(action: Action, globals: &GlobalArgs) -> Result<()> {
    match action {
        Action::Server { host, port } => {
            new(&host, port, globals).await?;
        }
    }

    Ok(())
}
