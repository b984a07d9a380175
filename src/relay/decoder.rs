//! Incremental event-stream decoding
//!
//! Converts a raw provider byte stream into complete event-frame
//! payloads. Network reads arrive fragmented: a read boundary can fall
//! inside a multi-byte character, inside a JSON payload, or inside the
//! frame delimiter itself, so both decoders are stateful and carry the
//! undecodable tail over to the next read.

/// Prefix marking a data line within an event frame
pub const DATA_PREFIX: &str = "data:";

/// Payload value signaling explicit end-of-stream from the provider
pub const STREAM_END_SENTINEL: &str = "[DONE]";

/// Frame delimiter: a run of two consecutive newlines
const FRAME_DELIMITER: &str = "\n\n";

/// Stateful UTF-8 decoder for fragmented byte streams
///
/// An incomplete multi-byte sequence at the end of a read is retained
/// and completed by the following read. Invalid byte runs decode to
/// U+FFFD and decoding resynchronizes after them.
#[derive(Debug, Default)]
pub struct Utf8StreamDecoder {
    pending: Vec<u8>,
}

impl Utf8StreamDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode the next chunk of bytes, returning all text that is
    /// complete so far
    pub fn decode(&mut self, bytes: &[u8]) -> String {
        self.pending.extend_from_slice(bytes);

        let mut out = String::new();
        loop {
            match std::str::from_utf8(&self.pending) {
                Ok(text) => {
                    out.push_str(text);
                    self.pending.clear();
                    break;
                }
                Err(e) => {
                    let valid = e.valid_up_to();
                    out.push_str(std::str::from_utf8(&self.pending[..valid]).unwrap_or(""));

                    match e.error_len() {
                        // Incomplete trailing sequence: keep it for the next read
                        None => {
                            self.pending.drain(..valid);
                            break;
                        }
                        // Invalid byte run: substitute and resynchronize
                        Some(len) => {
                            out.push(char::REPLACEMENT_CHARACTER);
                            self.pending.drain(..valid + len);
                        }
                    }
                }
            }
        }

        out
    }

    /// Whether bytes of an unfinished character are still buffered
    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }
}

/// Stateful event-frame decoder
///
/// Accumulates decoded text, splits it on the blank-line frame
/// delimiter and yields the payloads of every `data:` line in each
/// complete frame. A trailing partial frame stays buffered. Once the
/// end sentinel is seen the decoder is finished: buffered and future
/// input is discarded.
#[derive(Debug, Default)]
pub struct FrameDecoder {
    utf8: Utf8StreamDecoder,
    buffer: String,
    finished: bool,
}

impl FrameDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the end sentinel has been seen
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Feed raw bytes, returning the payloads of every frame completed
    /// by this read, in stream order
    pub fn feed(&mut self, bytes: &[u8]) -> Vec<String> {
        if self.finished {
            return Vec::new();
        }

        // Normalize CRLF framing so "\r\n\r\n" delimits like "\n\n"
        let text = self.utf8.decode(bytes).replace('\r', "");
        self.buffer.push_str(&text);

        let mut payloads = Vec::new();
        while let Some(pos) = self.buffer.find(FRAME_DELIMITER) {
            let frame: String = self
                .buffer
                .drain(..pos + FRAME_DELIMITER.len())
                .collect();

            for payload in frame_payloads(&frame) {
                if payload == STREAM_END_SENTINEL {
                    self.finished = true;
                    self.buffer.clear();
                    return payloads;
                }
                payloads.push(payload);
            }
        }

        payloads
    }
}

/// Extract the data-line payloads of one complete frame
fn frame_payloads(frame: &str) -> Vec<String> {
    frame
        .lines()
        .filter_map(|line| line.strip_prefix(DATA_PREFIX))
        .map(|payload| payload.trim().to_string())
        .filter(|payload| !payload.is_empty())
        .collect()
}
