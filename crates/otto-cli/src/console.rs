//! Console rendering of outgoing activities

use async_trait::async_trait;
use std::io::Write;

use otto_bot::{Activity, ActivitySink, Error, Result};

/// Renders activities to stdout.
///
/// Delay activities actually pause, so the greeting sequence feels the
/// same as it would in a chat channel.
pub struct ConsoleSink;

#[async_trait]
impl ActivitySink for ConsoleSink {
    async fn send(&self, activity: Activity) -> Result<()> {
        match activity {
            Activity::Delay { milliseconds } => {
                tokio::time::sleep(tokio::time::Duration::from_millis(milliseconds)).await;
                Ok(())
            }
            other => write_activity(&mut std::io::stdout(), &other),
        }
    }
}

/// Write a non-delay activity, surfacing I/O failures (closed pipe,
/// full disk) as delivery errors
fn write_activity<W: Write>(out: &mut W, activity: &Activity) -> Result<()> {
    let result = match activity {
        Activity::Message { text } => writeln!(out, "otto> {text}"),
        Activity::Typing => writeln!(out, "otto is typing..."),
        Activity::Delay { .. } => Ok(()),
    };
    result.map_err(|e| Error::Delivery(e.to_string()))
}
