use marquee_metadata::credentials::CredentialProvider;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWriteExt, BufReader, Stdin};
use tokio::sync::Mutex;
use tracing::warn;

pub const KEY_PROMPT: &str = "Enter your TMDB API key (leave blank to cancel): ";

/// Asks for the API key on stderr and reads one line back.
///
/// End of input or a blank line counts as declining.
pub struct LinePrompt<R> {
    message: String,
    input: Mutex<R>,
}

impl LinePrompt<BufReader<Stdin>> {
    pub fn stdin() -> Self {
        Self::new(KEY_PROMPT, BufReader::new(tokio::io::stdin()))
    }
}

impl<R: AsyncBufRead + Unpin + Send> LinePrompt<R> {
    pub fn new(message: impl Into<String>, input: R) -> Self {
        Self {
            message: message.into(),
            input: Mutex::new(input),
        }
    }
}

#[async_trait::async_trait]
impl<R: AsyncBufRead + Unpin + Send> CredentialProvider for LinePrompt<R> {
    async fn acquire(&self) -> Option<String> {
        let mut stderr = tokio::io::stderr();
        if let Err(e) = async {
            stderr.write_all(self.message.as_bytes()).await?;
            stderr.flush().await
        }
        .await
        {
            warn!(error = %e, "could not show key prompt");
        }

        let mut line = String::new();
        let mut input = self.input.lock().await;
        match input.read_line(&mut line).await {
            Ok(0) => None,
            Ok(_) => {
                let key = line.trim();
                (!key.is_empty()).then(|| key.to_string())
            }
            Err(e) => {
                warn!(error = %e, "could not read key");
                None
            }
        }
    }
}
