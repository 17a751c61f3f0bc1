pub mod submit;

use anyhow::Result;

#[derive(Debug)]
pub enum Action {
    Submit(submit::Args),
}

impl Action {
    /// Run the action to completion.
    ///
    /// # Errors
    /// Returns an error if the action fails or the attempt ends with an error banner.
    pub async fn execute(self) -> Result<()> {
        match self {
            Self::Submit(args) => submit::handle(args).await,
        }
    }
}
