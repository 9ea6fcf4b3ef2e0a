use anyhow::{Context, Result};
use limber::landmarks::{FrameDecoder, LandmarkSnapshot};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncRead, BufReader, Lines};

pub type BoxedReader = BufReader<Box<dyn AsyncRead + Unpin + Send>>;

/// Async JSON-lines landmark input for the live dashboard.
pub struct FrameStream<R> {
    lines: Lines<R>,
    decoder: FrameDecoder,
}

impl FrameStream<BoxedReader> {
    /// Opens a file, or stdin for `-`.
    pub async fn open(input: &str) -> Result<Self> {
        let reader: Box<dyn AsyncRead + Unpin + Send> = if input == "-" {
            Box::new(tokio::io::stdin())
        } else {
            let file = tokio::fs::File::open(input)
                .await
                .with_context(|| format!("Failed to open landmark input {}", input))?;
            Box::new(file)
        };
        Ok(Self::new(BufReader::new(reader)))
    }
}

impl<R: AsyncBufRead + Unpin> FrameStream<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            decoder: FrameDecoder::new(),
        }
    }

    /// Reads the next frame. The outer `None` is end of input; the inner one
    /// is a frame where no pose was detected.
    pub async fn next_frame(&mut self) -> Result<Option<Option<LandmarkSnapshot>>> {
        while let Some(line) = self.lines.next_line().await? {
            if let Some(frame) = self.decoder.decode_line(&line) {
                return Ok(Some(frame?));
            }
        }
        Ok(None)
    }
}
