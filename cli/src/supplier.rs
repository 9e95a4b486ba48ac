use async_trait::async_trait;
use pairmatch_protocol::FaceToken;
use pairmatch_runtime::{AcquireError, ImageSupplier};
use std::io::Write;

use crate::input::Input;

/// Hands out `A`, `B`, ..., `Z`, then `AA`, `AB`, ... like spreadsheet columns.
#[derive(Copy, Clone, Debug, Default)]
pub struct LabelSupplier;

pub fn label(mut n: usize) -> String {
    let mut label = Vec::new();
    loop {
        label.push(b'A' + (n % 26) as u8);
        if n < 26 {
            break;
        }
        n = n / 26 - 1;
    }
    label.reverse();
    String::from_utf8_lossy(&label).into_owned()
}

#[async_trait]
impl ImageSupplier for LabelSupplier {
    async fn acquire_faces(&self, count: usize) -> Result<Vec<FaceToken>, AcquireError> {
        Ok((0..count).map(|n| FaceToken::new(label(n))).collect())
    }
}

/// Asks the player to type one face per line; an empty line backs out.
pub struct PromptSupplier {
    input: Input,
}

impl PromptSupplier {
    pub fn new(input: Input) -> Self {
        Self { input }
    }
}

#[async_trait]
impl ImageSupplier for PromptSupplier {
    async fn acquire_faces(&self, count: usize) -> Result<Vec<FaceToken>, AcquireError> {
        let mut faces = Vec::with_capacity(count);
        while faces.len() < count {
            print!("face {} of {} (empty to cancel): ", faces.len() + 1, count);
            let _ = std::io::stdout().flush();
            match self.input.line().await {
                Ok(Some(line)) if line.is_empty() => break,
                Ok(Some(line)) => faces.push(FaceToken::new(line)),
                Ok(None) => break,
                Err(err) => return Err(AcquireError::Failed(err.to_string())),
            }
        }
        if faces.is_empty() {
            return Err(AcquireError::Cancelled);
        }
        // a short list is treated as a cancelled attempt by the loader
        Ok(faces)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_continue_past_z() {
        assert_eq!(label(0), "A");
        assert_eq!(label(25), "Z");
        assert_eq!(label(26), "AA");
        assert_eq!(label(27), "AB");
        assert_eq!(label(26 + 26 * 26), "AAA");
    }

    #[tokio::test]
    async fn labels_are_unique() {
        let faces = LabelSupplier.acquire_faces(60).await.unwrap();
        let mut sorted = faces.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(sorted.len(), 60);
    }

    #[tokio::test]
    async fn prompt_reads_one_face_per_line() {
        let input = Input::from_reader(&b"cat\n dog \nowl\n"[..]);
        let faces = PromptSupplier::new(input).acquire_faces(2).await.unwrap();
        assert_eq!(faces, [FaceToken::from("cat"), FaceToken::from("dog")]);
    }

    #[tokio::test]
    async fn empty_line_cancels_or_cuts_short() {
        let input = Input::from_reader(&b"\ncat\n\n"[..]);
        let supplier = PromptSupplier::new(input);
        assert_eq!(
            supplier.acquire_faces(2).await,
            Err(AcquireError::Cancelled)
        );
        assert_eq!(
            supplier.acquire_faces(2).await.unwrap(),
            [FaceToken::from("cat")]
        );
    }
}
