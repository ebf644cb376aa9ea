use crate::api;
use crate::cli::actions::Action;
use anyhow::{Context, Result};
use url::Url;

/// Handle the server action
pub async fn handle(action: Action) -> Result<()> {
    match action {
        Action::Server { port, dsn, secret } => {
            // Validate the DSN shape before handing it to the pool
            let dsn = Url::parse(&dsn).context("Invalid database connection string")?;

            api::new(port, dsn.as_str(), &secret).await?;
        }
    }

    Ok(())
}
