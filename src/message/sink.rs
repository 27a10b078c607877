use std::io::Write;
use std::sync::mpsc::Sender;

use crate::error::DetectError;
use crate::message::messages::FieldsMessage;

/// Where the converged field list is delivered.
pub trait FieldSink {
    fn deliver(&mut self, message: &FieldsMessage) -> Result<(), DetectError>;
}

/// In-process consumer on the other end of a channel.
pub struct ChannelSink {
    tx: Sender<FieldsMessage>,
}

impl ChannelSink {
    pub fn new(tx: Sender<FieldsMessage>) -> Self {
        Self { tx }
    }
}

impl FieldSink for ChannelSink {
    fn deliver(&mut self, message: &FieldsMessage) -> Result<(), DetectError> {
        self.tx
            .send(message.clone())
            .map_err(|_| DetectError::Sink("field receiver disconnected".into()))
    }
}

/// One JSON message per line on any writer (stdout, file, pipe).
pub struct JsonLinesSink<W: Write> {
    writer: W,
}

impl<W: Write> JsonLinesSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> FieldSink for JsonLinesSink<W> {
    fn deliver(&mut self, message: &FieldsMessage) -> Result<(), DetectError> {
        let json = serde_json::to_string(message)
            .map_err(|e| DetectError::Sink(format!("failed to serialize message: {}", e)))?;

        writeln!(self.writer, "{}", json)
            .and_then(|_| self.writer.flush())
            .map_err(|e| DetectError::Sink(format!("failed to write message: {}", e)))
    }
}

/// POSTs the message as JSON to an out-of-process consumer.
pub struct HttpSink {
    endpoint: String,
    client: reqwest::blocking::Client,
}

impl HttpSink {
    pub fn new(endpoint: &str) -> Self {
        Self {
            endpoint: endpoint.to_string(),
            client: reqwest::blocking::Client::new(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl FieldSink for HttpSink {
    fn deliver(&mut self, message: &FieldsMessage) -> Result<(), DetectError> {
        self.client
            .post(&self.endpoint)
            .json(message)
            .send()?
            .error_for_status()?;
        Ok(())
    }
}
