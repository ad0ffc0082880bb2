//! OSC transport for VRChat.
//!
//! [`OscReceiver`] listens for avatar parameter messages and forwards them
//! over a channel; [`OscSender`] writes chatbox input back to VRChat.

use crate::dispatch::ParameterUpdate;
use crate::handler::{ChatSink, ParamValue};
use crossbeam_channel::Sender;
use rosc::{OscMessage, OscPacket, OscType};
use std::io;
use std::net::{SocketAddr, UdpSocket};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Address prefix of avatar parameter messages.
pub const AVATAR_PARAMETERS_PREFIX: &str = "/avatar/parameters/";

/// Address of the chatbox input endpoint.
pub const CHATBOX_INPUT_ADDRESS: &str = "/chatbox/input";

/// Largest datagram we accept.
const MAX_PACKET_SIZE: usize = rosc::decoder::MTU;

/// Flatten a packet into the parameter updates it carries.
pub fn parameter_updates(packet: OscPacket) -> Vec<ParameterUpdate> {
    let mut updates = Vec::new();
    collect_updates(packet, &mut updates);
    updates
}

fn collect_updates(packet: OscPacket, out: &mut Vec<ParameterUpdate>) {
    match packet {
        OscPacket::Message(message) => {
            if !message.addr.starts_with(AVATAR_PARAMETERS_PREFIX) {
                return;
            }
            let value = message
                .args
                .into_iter()
                .next()
                .map(ParamValue::from)
                .unwrap_or(ParamValue::Nil);
            out.push(ParameterUpdate {
                address: message.addr,
                value,
            });
        }
        OscPacket::Bundle(bundle) => {
            for packet in bundle.content {
                collect_updates(packet, out);
            }
        }
    }
}

/// Receives OSC parameter messages from VRChat.
pub struct OscReceiver {
    socket: UdpSocket,
}

impl OscReceiver {
    /// Bind to `addr`.
    pub fn bind(addr: SocketAddr) -> io::Result<Self> {
        let socket = UdpSocket::bind(addr)?;
        // Wake up periodically so the running flag is honoured
        socket.set_read_timeout(Some(Duration::from_millis(100)))?;
        Ok(Self { socket })
    }

    /// Start the receive loop on a background thread.
    ///
    /// The thread exits when `running` is cleared or the channel closes.
    pub fn spawn(
        self,
        sender: Sender<ParameterUpdate>,
        running: Arc<AtomicBool>,
    ) -> io::Result<JoinHandle<()>> {
        thread::Builder::new()
            .name("osc-receiver".to_string())
            .spawn(move || self.run(sender, running))
    }

    fn run(self, sender: Sender<ParameterUpdate>, running: Arc<AtomicBool>) {
        info!(addr = ?self.socket.local_addr().ok(), "Starting OSC server...");
        let mut buf = [0u8; MAX_PACKET_SIZE];

        while running.load(Ordering::SeqCst) {
            let size = match self.socket.recv_from(&mut buf) {
                Ok((size, _)) => size,
                Err(e)
                    if e.kind() == io::ErrorKind::WouldBlock
                        || e.kind() == io::ErrorKind::TimedOut =>
                {
                    continue;
                }
                Err(e) => {
                    error!("OSC receive failed: {e}");
                    continue;
                }
            };

            let packet = match rosc::decoder::decode_udp(&buf[..size]) {
                Ok((_, packet)) => packet,
                Err(e) => {
                    warn!("Dropping malformed OSC packet: {e:?}");
                    continue;
                }
            };

            for update in parameter_updates(packet) {
                if sender.send(update).is_err() {
                    debug!("Parameter channel closed, stopping OSC receiver");
                    return;
                }
            }
        }
    }
}

/// Sends OSC messages to VRChat.
pub struct OscSender {
    socket: UdpSocket,
    target: SocketAddr,
}

impl OscSender {
    /// Create a sender targeting `target` from an ephemeral local port.
    pub fn new(target: SocketAddr) -> io::Result<Self> {
        let local: SocketAddr = if target.is_ipv4() {
            SocketAddr::from(([0, 0, 0, 0], 0))
        } else {
            SocketAddr::from(([0u16; 8], 0))
        };
        let socket = UdpSocket::bind(local)?;
        Ok(Self { socket, target })
    }

    /// Send one OSC message.
    pub fn send_parameter(&self, address: &str, args: Vec<OscType>) -> io::Result<()> {
        debug!(address, ?args, "Sending");
        let packet = OscPacket::Message(OscMessage {
            addr: address.to_string(),
            args,
        });
        let bytes = rosc::encoder::encode(&packet)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, format!("{e:?}")))?;
        self.socket.send_to(&bytes, self.target)?;
        Ok(())
    }
}

/// Chatbox input arguments: text, send immediately, no notification sound.
pub fn chatbox_args(text: &str) -> Vec<OscType> {
    vec![
        OscType::String(text.to_string()),
        OscType::Bool(true),
        OscType::Bool(false),
    ]
}

impl ChatSink for OscSender {
    fn send_to_chat(&self, text: &str) {
        if let Err(e) = self.send_parameter(CHATBOX_INPUT_ADDRESS, chatbox_args(text)) {
            error!("Failed to send chat message: {e}");
        }
    }
}
