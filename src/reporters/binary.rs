//! Binary reporter
//!
//! A 4-byte little-endian payload length followed by a bitcode-encoded
//! [`CommentSentimentResults`] message.

use crate::models::{Day, DaySentiment, SentimentResult};
use anyhow::{anyhow, bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::{Read, Write};

const LENGTH_PREFIX: usize = 4;

/// Wire record of one day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sentiment {
    pub value: f32,
    pub comments: Vec<String>,
    pub commits: Vec<String>,
}

/// Wire message of a whole result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct CommentSentimentResults {
    pub sentiment_by_day: BTreeMap<i32, Sentiment>,
}

impl From<&SentimentResult> for CommentSentimentResults {
    fn from(result: &SentimentResult) -> Self {
        let sentiment_by_day = result
            .days
            .iter()
            .map(|(day, s)| {
                (
                    *day,
                    Sentiment {
                        value: s.score,
                        comments: s.comments.clone(),
                        commits: s.commits.clone(),
                    },
                )
            })
            .collect();
        Self { sentiment_by_day }
    }
}

impl From<CommentSentimentResults> for SentimentResult {
    fn from(message: CommentSentimentResults) -> Self {
        let days = message
            .sentiment_by_day
            .into_iter()
            .map(|(day, s)| {
                (
                    day as Day,
                    DaySentiment {
                        score: s.value,
                        comments: s.comments,
                        commits: s.commits,
                    },
                )
            })
            .collect();
        SentimentResult { days }
    }
}

/// Encode a result as a length-prefixed message
pub fn encode(result: &SentimentResult) -> Result<Vec<u8>> {
    let message = CommentSentimentResults::from(result);
    let payload =
        bitcode::serialize(&message).map_err(|e| anyhow!("Failed to encode sentiment: {}", e))?;
    let len = u32::try_from(payload.len())
        .with_context(|| format!("Sentiment message too large: {} bytes", payload.len()))?;

    let mut out = Vec::with_capacity(LENGTH_PREFIX + payload.len());
    out.extend_from_slice(&len.to_le_bytes());
    out.extend_from_slice(&payload);
    Ok(out)
}

/// Decode a length-prefixed message produced by [`encode`]
pub fn decode(bytes: &[u8]) -> Result<SentimentResult> {
    if bytes.len() < LENGTH_PREFIX {
        bail!("Truncated sentiment message: {} bytes", bytes.len());
    }
    let (prefix, rest) = bytes.split_at(LENGTH_PREFIX);
    let len = u32::from_le_bytes([prefix[0], prefix[1], prefix[2], prefix[3]]) as usize;
    if rest.len() < len {
        bail!(
            "Truncated sentiment message: expected {} payload bytes, got {}",
            len,
            rest.len()
        );
    }
    let message: CommentSentimentResults = bitcode::deserialize(&rest[..len])
        .map_err(|e| anyhow!("Failed to decode sentiment: {}", e))?;
    Ok(message.into())
}

/// Read one length-prefixed message from a stream
pub fn read_binary(reader: &mut dyn Read) -> Result<SentimentResult> {
    let mut prefix = [0u8; LENGTH_PREFIX];
    reader
        .read_exact(&mut prefix)
        .context("Failed to read sentiment message length")?;
    let len = u32::from_le_bytes(prefix) as usize;

    let mut buf = Vec::with_capacity(LENGTH_PREFIX + len);
    buf.extend_from_slice(&prefix);
    buf.resize(LENGTH_PREFIX + len, 0);
    reader
        .read_exact(&mut buf[LENGTH_PREFIX..])
        .context("Failed to read sentiment message payload")?;
    decode(&buf)
}

pub fn write(result: &SentimentResult, writer: &mut dyn Write) -> Result<()> {
    let bytes = encode(result)?;
    writer
        .write_all(&bytes)
        .context("Failed to write binary report")
}
