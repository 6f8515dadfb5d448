//! A stream of consecutive JSON values over any reader/writer pair.

use std::io::{BufReader, BufWriter, Read, Write};
use std::net::TcpStream;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::de::IoRead;
use serde_json::{StreamDeserializer, Value};

use crate::core::error::{Result, TsuroError};

/// Reads and writes whitespace-separated JSON values.
pub struct JsonStream<R: Read, W: Write> {
    incoming: StreamDeserializer<'static, IoRead<BufReader<R>>, Value>,
    writer: BufWriter<W>,
}

impl<R: Read, W: Write> JsonStream<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self {
            incoming: serde_json::Deserializer::from_reader(BufReader::new(reader)).into_iter(),
            writer: BufWriter::new(writer),
        }
    }

    /// Write one value followed by a newline, then flush.
    pub fn send<T: Serialize + ?Sized>(&mut self, message: &T) -> Result<()> {
        serde_json::to_writer(&mut self.writer, message)
            .map_err(|err| TsuroError::protocol(format!("could not encode message: {}", err)))?;
        self.writer
            .write_all(b"\n")
            .and_then(|()| self.writer.flush())
            .map_err(|err| TsuroError::protocol(format!("could not send message: {}", err)))
    }

    /// The next value, or `None` once the other side has closed.
    pub fn receive_value(&mut self) -> Result<Option<Value>> {
        match self.incoming.next() {
            None => Ok(None),
            Some(Ok(value)) => Ok(Some(value)),
            Some(Err(err)) if err.is_eof() => Ok(None),
            Some(Err(err)) => Err(TsuroError::protocol(format!("could not read message: {}", err))),
        }
    }

    /// The next value decoded as `T`. A closed stream is an error.
    pub fn receive<T: DeserializeOwned>(&mut self) -> Result<T> {
        let value = self
            .receive_value()?
            .ok_or_else(|| TsuroError::protocol("connection closed"))?;
        serde_json::from_value(value).map_err(|err| TsuroError::protocol(format!("malformed message: {}", err)))
    }

    /// The underlying writer. Everything sent so far has been flushed to it.
    pub fn writer_mut(&mut self) -> &mut W {
        self.writer.get_mut()
    }
}

impl JsonStream<TcpStream, TcpStream> {
    /// Split a TCP connection into a JSON stream.
    pub fn from_tcp(stream: TcpStream) -> Result<Self> {
        let reader = stream
            .try_clone()
            .map_err(|err| TsuroError::protocol(format!("could not clone connection: {}", err)))?;
        Ok(Self::new(reader, stream))
    }
}

impl<R: Read, W: Write> std::fmt::Debug for JsonStream<R, W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonStream").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Cursor;

    #[test]
    fn test_reads_consecutive_values() {
        let input = Cursor::new(b"[\"a\", 1] \"void\"\n{\"k\": true}".to_vec());
        let mut stream = JsonStream::new(input, Vec::new());

        assert_eq!(stream.receive_value().unwrap(), Some(json!(["a", 1])));
        let void: String = stream.receive().unwrap();
        assert_eq!(void, "void");
        assert_eq!(stream.receive_value().unwrap(), Some(json!({"k": true})));
        assert_eq!(stream.receive_value().unwrap(), None);
        assert!(stream.receive::<Value>().is_err());
    }

    #[test]
    fn test_writes_one_value_per_line() {
        let mut stream = JsonStream::new(Cursor::new(Vec::new()), Vec::new());
        stream.send(&json!(["others", ["red"]])).unwrap();
        stream.send("void").unwrap();
        assert_eq!(
            String::from_utf8(stream.writer_mut().clone()).unwrap(),
            "[\"others\",[\"red\"]]\n\"void\"\n"
        );
    }

    #[test]
    fn test_garbage_is_an_error() {
        let mut stream = JsonStream::new(Cursor::new(b"[1, }".to_vec()), Vec::new());
        assert!(matches!(stream.receive_value(), Err(TsuroError::Protocol(_))));
    }
}
