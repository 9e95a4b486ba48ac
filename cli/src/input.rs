use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines};
use tokio::sync::Mutex;

/// Line reader shared by everything that prompts the player.
#[derive(Clone)]
pub struct Input {
    lines: Arc<Mutex<Lines<Box<dyn AsyncBufRead + Send + Unpin>>>>,
}

impl Input {
    pub fn stdin() -> Self {
        Self::from_reader(BufReader::new(tokio::io::stdin()))
    }

    pub fn from_reader(reader: impl AsyncBufRead + Send + Unpin + 'static) -> Self {
        let reader: Box<dyn AsyncBufRead + Send + Unpin> = Box::new(reader);
        Self {
            lines: Arc::new(Mutex::new(reader.lines())),
        }
    }

    /// Next trimmed line, `None` once input is closed.
    ///
    /// Cancel safe, so it can race against other futures in `select!`.
    pub async fn line(&self) -> std::io::Result<Option<String>> {
        let mut lines = self.lines.lock().await;
        Ok(lines.next_line().await?.map(|line| line.trim().to_owned()))
    }
}
