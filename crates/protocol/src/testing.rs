//! In-memory picoFace double that parses host frames and answers them.

use crate::control::{
    ACK, COMMAND_END, COMMAND_RECEIVE_DATA, COMMAND_RESPONSE_BEGIN, COMMAND_RESPONSE_END,
    COMMAND_START, COMMAND_SUCCESS, END_OF_DATA, START_OF_DATA, START_OF_PACKET,
};
use std::collections::{HashMap, VecDeque};
use std::io::{self, Read, Write};

/// How the device answers one step of a transfer.
#[derive(Debug, Clone, Copy)]
pub enum Reply {
    Byte(u8),
    Silence,
}

enum State {
    Idle,
    Command(Vec<u8>),
    Header(Vec<u8>),
    BetweenPackets,
    PacketLen(Vec<u8>),
    Payload { remaining: usize },
}

pub struct FakeDevice {
    state: State,
    outbound: VecDeque<u8>,
    written: Vec<u8>,
    commands: Vec<String>,
    packets: Vec<Vec<u8>>,
    declared_total: Option<u32>,
    command_reply: Vec<u8>,
    after_transfer: Vec<u8>,
    header_reply: Reply,
    packet_replies: HashMap<usize, Reply>,
    end_reply: Reply,
}

impl FakeDevice {
    /// A device that asks for data after any command and reports success.
    pub fn accepting() -> Self {
        let mut after_transfer = vec![COMMAND_SUCCESS];
        after_transfer.extend_from_slice(b"Loaded");
        after_transfer.push(COMMAND_RESPONSE_END);

        Self {
            state: State::Idle,
            outbound: VecDeque::new(),
            written: Vec::new(),
            commands: Vec::new(),
            packets: Vec::new(),
            declared_total: None,
            command_reply: vec![COMMAND_RESPONSE_BEGIN, COMMAND_RECEIVE_DATA],
            after_transfer,
            header_reply: Reply::Byte(ACK),
            packet_replies: HashMap::new(),
            end_reply: Reply::Byte(ACK),
        }
    }

    pub fn with_command_reply(mut self, bytes: &[u8]) -> Self {
        self.command_reply = bytes.to_vec();
        self
    }

    pub fn with_after_transfer(mut self, bytes: &[u8]) -> Self {
        self.after_transfer = bytes.to_vec();
        self
    }

    pub fn with_header_reply(mut self, reply: Reply) -> Self {
        self.header_reply = reply;
        self
    }

    pub fn with_packet_reply(mut self, index: usize, reply: Reply) -> Self {
        self.packet_replies.insert(index, reply);
        self
    }

    pub fn with_end_reply(mut self, reply: Reply) -> Self {
        self.end_reply = reply;
        self
    }

    pub fn written(&self) -> &[u8] {
        &self.written
    }

    pub fn commands(&self) -> &[String] {
        &self.commands
    }

    pub fn received_payload(&self) -> Vec<u8> {
        self.packets.concat()
    }

    pub fn packet_sizes(&self) -> Vec<usize> {
        self.packets.iter().map(Vec::len).collect()
    }

    pub fn declared_total(&self) -> Option<u32> {
        self.declared_total
    }

    fn queue(&mut self, reply: Reply) -> bool {
        match reply {
            Reply::Byte(byte) => {
                self.outbound.push_back(byte);
                byte == ACK
            }
            Reply::Silence => false,
        }
    }

    fn packet_done(&mut self) {
        let index = self.packets.len() - 1;
        let reply = self.packet_replies.get(&index).copied().unwrap_or(Reply::Byte(ACK));
        self.queue(reply);
        self.state = State::BetweenPackets;
    }

    fn accept(&mut self, byte: u8) {
        let state = std::mem::replace(&mut self.state, State::Idle);
        self.state = match state {
            State::Idle => match byte {
                COMMAND_START => State::Command(Vec::new()),
                START_OF_DATA => State::Header(Vec::new()),
                _ => State::Idle,
            },
            State::Command(mut name) => {
                if byte == COMMAND_END {
                    self.commands.push(String::from_utf8_lossy(&name).into_owned());
                    let reply = self.command_reply.clone();
                    self.outbound.extend(reply);
                    State::Idle
                } else {
                    name.push(byte);
                    State::Command(name)
                }
            }
            State::Header(mut size) => {
                size.push(byte);
                if size.len() == 4 {
                    self.declared_total = Some(u32::from_be_bytes([size[0], size[1], size[2], size[3]]));
                    self.queue(self.header_reply);
                    State::BetweenPackets
                } else {
                    State::Header(size)
                }
            }
            State::BetweenPackets => match byte {
                START_OF_PACKET => State::PacketLen(Vec::new()),
                END_OF_DATA => {
                    if self.queue(self.end_reply) {
                        let tail = self.after_transfer.clone();
                        self.outbound.extend(tail);
                    }
                    State::Idle
                }
                _ => State::BetweenPackets,
            },
            State::PacketLen(mut len) => {
                len.push(byte);
                if len.len() == 2 {
                    let remaining = usize::from(u16::from_be_bytes([len[0], len[1]]));
                    self.packets.push(Vec::with_capacity(remaining));
                    if remaining == 0 {
                        self.packet_done();
                        return;
                    }
                    State::Payload { remaining }
                } else {
                    State::PacketLen(len)
                }
            }
            State::Payload { remaining } => {
                if let Some(packet) = self.packets.last_mut() {
                    packet.push(byte);
                }
                if remaining == 1 {
                    self.packet_done();
                    return;
                }
                State::Payload {
                    remaining: remaining - 1,
                }
            }
        };
    }
}

impl Read for FakeDevice {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.outbound.is_empty() {
            return Err(io::ErrorKind::TimedOut.into());
        }
        let n = buf.len().min(self.outbound.len());
        for (slot, byte) in buf.iter_mut().zip(self.outbound.drain(..n)) {
            *slot = byte;
        }
        Ok(n)
    }
}

impl Write for FakeDevice {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.written.extend_from_slice(buf);
        for &byte in buf {
            self.accept(byte);
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
