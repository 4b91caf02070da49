//! RethinkDB cluster provider
//!
//! Concrete implementation speaking the JSON client protocol over TCP.
//!
//! Every query is framed as an 8-byte little-endian token, a 4-byte
//! little-endian body length and the JSON body. Replies echo the token.

use crate::config::ClusterEndpoint;
use crate::db::provider::{Connector, Session};
use crate::db::reql::Term;
use crate::error::{DriverError, DriverResult, ServerErrorKind};
use bytes::{Buf, BufMut, BytesMut};
use serde::Deserialize;
use serde_json::{Value, json};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpStream;
use tracing::debug;

/// `VersionDummy::Version::V0_4`
const PROTOCOL_V0_4: u32 = 0x400c_2d20;
/// `VersionDummy::Protocol::JSON`
const PROTOCOL_JSON: u32 = 0x7e69_70c7;

const MAX_HANDSHAKE_REPLY: usize = 1024;
const MAX_RESPONSE_LEN: usize = 64 * 1024 * 1024;
const FRAME_HEADER_LEN: usize = 12;

const QUERY_START: u32 = 1;

mod response_type {
    pub const SUCCESS_ATOM: u32 = 1;
    pub const SUCCESS_SEQUENCE: u32 = 2;
    pub const CLIENT_ERROR: u32 = 16;
    pub const COMPILE_ERROR: u32 = 17;
    pub const RUNTIME_ERROR: u32 = 18;
}

/// Opens plain TCP sessions using the V0_4 handshake with an empty auth key
#[derive(Debug, Default, Clone, Copy)]
pub struct RethinkConnector;

impl Connector for RethinkConnector {
    type Session = RethinkSession<TcpStream>;

    async fn connect(&self, endpoint: &ClusterEndpoint) -> DriverResult<Self::Session> {
        let address = endpoint.address();
        debug!(%address, "opening tcp connection");
        let stream = TcpStream::connect(&address).await?;
        stream.set_nodelay(true)?;
        RethinkSession::handshake(stream).await
    }
}

/// A handshaken connection to one node
pub struct RethinkSession<S> {
    stream: S,
    next_token: u64,
}

impl<S> RethinkSession<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// Perform the client handshake on an already-open stream
    pub async fn handshake(mut stream: S) -> DriverResult<Self> {
        let mut hello = BytesMut::with_capacity(12);
        hello.put_u32_le(PROTOCOL_V0_4);
        // auth key length, followed by zero key bytes
        hello.put_u32_le(0);
        hello.put_u32_le(PROTOCOL_JSON);
        stream.write_all(&hello).await?;
        stream.flush().await?;

        let reply = read_nul_terminated(&mut stream).await?;
        if reply != "SUCCESS" {
            return Err(DriverError::Handshake(reply));
        }
        debug!("handshake complete");

        Ok(Self {
            stream,
            next_token: 1,
        })
    }

    async fn read_response(&mut self, token: u64) -> DriverResult<Response> {
        let mut header = [0u8; FRAME_HEADER_LEN];
        self.stream.read_exact(&mut header).await?;
        let mut header = &header[..];
        let reply_token = header.get_u64_le();
        let len = header.get_u32_le() as usize;

        if reply_token != token {
            return Err(DriverError::Protocol(format!(
                "expected reply for token {}, got {}",
                token, reply_token
            )));
        }
        if len > MAX_RESPONSE_LEN {
            return Err(DriverError::Protocol(format!(
                "response of {} bytes exceeds limit",
                len
            )));
        }

        let mut body = vec![0u8; len];
        self.stream.read_exact(&mut body).await?;
        serde_json::from_slice(&body)
            .map_err(|e| DriverError::Protocol(format!("invalid response body: {}", e)))
    }
}

impl<S> Session for RethinkSession<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    async fn run(&mut self, term: &Term) -> DriverResult<Value> {
        let token = self.next_token;
        self.next_token += 1;

        let frame = encode_query(token, term)?;
        debug!(token, bytes = frame.len(), "sending query");
        self.stream.write_all(&frame).await?;
        self.stream.flush().await?;

        let response = self.read_response(token).await?;
        debug!(token, response_type = response.t, "received response");
        response.into_result()
    }

    async fn close(mut self) -> DriverResult<()> {
        self.stream.shutdown().await?;
        Ok(())
    }
}

/// Frame a `START` query for `term`
fn encode_query(token: u64, term: &Term) -> DriverResult<BytesMut> {
    let body = serde_json::to_vec(&json!([QUERY_START, term.to_json(), {}]))
        .map_err(|e| DriverError::Protocol(format!("could not encode query: {}", e)))?;

    let len = body_len(body.len())?;
    let mut frame = BytesMut::with_capacity(FRAME_HEADER_LEN + body.len());
    frame.put_u64_le(token);
    frame.put_u32_le(len);
    frame.put_slice(&body);
    Ok(frame)
}

/// Query bodies carry a u32 length prefix
fn body_len(len: usize) -> DriverResult<u32> {
    u32::try_from(len).map_err(|_| {
        DriverError::Protocol(format!("query body of {} bytes is too large", len))
    })
}

async fn read_nul_terminated<S: AsyncRead + Unpin>(stream: &mut S) -> DriverResult<String> {
    let mut bytes = Vec::new();
    loop {
        let byte = stream.read_u8().await?;
        if byte == 0 {
            break;
        }
        if bytes.len() == MAX_HANDSHAKE_REPLY {
            return Err(DriverError::Handshake(
                "server reply is not NUL-terminated".to_string(),
            ));
        }
        bytes.push(byte);
    }
    String::from_utf8(bytes)
        .map_err(|_| DriverError::Handshake("server reply is not valid UTF-8".to_string()))
}

/// Server reply body
#[derive(Debug, Deserialize)]
struct Response {
    t: u32,
    #[serde(default)]
    r: Vec<Value>,
    #[serde(default)]
    e: Option<u32>,
}

impl Response {
    fn into_result(self) -> DriverResult<Value> {
        let kind = match self.t {
            response_type::SUCCESS_ATOM => {
                return self.r.into_iter().next().ok_or_else(|| {
                    DriverError::Protocol("atom response without a datum".to_string())
                });
            }
            response_type::SUCCESS_SEQUENCE => return Ok(Value::Array(self.r)),
            response_type::CLIENT_ERROR => ServerErrorKind::Client,
            response_type::COMPILE_ERROR => ServerErrorKind::Compile,
            response_type::RUNTIME_ERROR => ServerErrorKind::Runtime,
            other => {
                return Err(DriverError::Protocol(format!(
                    "unsupported response type {}",
                    other
                )));
            }
        };

        let message = self
            .r
            .first()
            .and_then(Value::as_str)
            .unwrap_or("no error message")
            .to_string();

        Err(DriverError::Server {
            kind,
            error_type: self.e,
            message,
        })
    }
}
