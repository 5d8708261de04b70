// Feetech STS serial bus protocol
//
// Packet format: [0xFF, 0xFF, ID, Length, Instruction, Params..., Checksum]
// Length counts instruction + params + checksum. Checksum is the inverted
// low byte of the sum of everything after the header.

use std::io::{Read, Write};
use std::time::Duration;

use serialport::SerialPort;
use tracing::debug;

pub const DEFAULT_BAUDRATE: u32 = 1_000_000;
pub const DEFAULT_TIMEOUT_MS: u64 = 100;

const HEADER: [u8; 2] = [0xFF, 0xFF];
const BROADCAST_ID: u8 = 0xFE;

#[repr(u8)]
#[derive(Debug, Clone, Copy)]
pub enum Instruction {
    Ping = 0x01,
    Read = 0x02,
    Write = 0x03,
    SyncWrite = 0x83,
}

/// Register addresses used by the runtime
#[repr(u8)]
#[derive(Debug, Clone, Copy)]
pub enum Register {
    OperatingMode = 33,      // 1 byte: 0=position, 1=velocity, 2=PWM, 3=step
    TorqueEnable = 40,       // 1 byte
    GoalVelocity = 46,       // 2 bytes, sign-magnitude
    Lock = 55,               // 1 byte
    PresentTemperature = 63, // 1 byte, degrees C
}

#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OperatingMode {
    Position = 0,
    Velocity = 1,
    Pwm = 2,
    Step = 3,
}

#[derive(Debug, thiserror::Error)]
pub enum FeetechError {
    #[error("Serial port error: {0}")]
    Serial(#[from] serialport::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid response from motor {id}: {reason}")]
    InvalidResponse { id: u8, reason: String },

    #[error("Checksum mismatch for motor {id}")]
    ChecksumMismatch { id: u8 },

    #[error("Motor {id} returned error status: 0x{status:02X}")]
    MotorError { id: u8, status: u8 },

    #[error("Timeout waiting for response from motor {id}")]
    Timeout { id: u8 },
}

pub type Result<T> = std::result::Result<T, FeetechError>;

/// Motor bus over any byte transport (a serial port in production)
pub struct FeetechBus<T = Box<dyn SerialPort>> {
    port: T,
}

impl FeetechBus<Box<dyn SerialPort>> {
    pub fn open(port_name: &str) -> Result<Self> {
        Self::open_with_baudrate(port_name, DEFAULT_BAUDRATE)
    }

    pub fn open_with_baudrate(port_name: &str, baudrate: u32) -> Result<Self> {
        let port = serialport::new(port_name, baudrate)
            .timeout(Duration::from_millis(DEFAULT_TIMEOUT_MS))
            .open()?;
        Ok(Self { port })
    }
}

impl<T: Read + Write> FeetechBus<T> {
    /// Wrap an already opened transport
    pub fn from_transport(port: T) -> Self {
        Self { port }
    }

    pub fn transport(&self) -> &T {
        &self.port
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.port
    }

    fn send(&mut self, id: u8, instruction: Instruction, params: &[u8]) -> Result<()> {
        let packet = build_packet(id, instruction, params);
        self.port.write_all(&packet)?;
        self.port.flush()?;
        Ok(())
    }

    fn read_exact_from(&mut self, id: u8, buf: &mut [u8]) -> Result<()> {
        self.port.read_exact(buf).map_err(|e| match e.kind() {
            std::io::ErrorKind::TimedOut | std::io::ErrorKind::UnexpectedEof => {
                FeetechError::Timeout { id }
            }
            _ => FeetechError::Io(e),
        })
    }

    /// Read one status packet and return its parameters
    fn read_status(&mut self, expected_id: u8) -> Result<Vec<u8>> {
        let mut head = [0u8; 4];
        self.read_exact_from(expected_id, &mut head)?;

        if head[..2] != HEADER {
            return Err(FeetechError::InvalidResponse {
                id: expected_id,
                reason: format!("Invalid header: {:02X?}", &head[..2]),
            });
        }
        let (id, length) = (head[2], head[3] as usize);
        if id != expected_id {
            return Err(FeetechError::InvalidResponse {
                id: expected_id,
                reason: format!("ID mismatch: expected {}, got {}", expected_id, id),
            });
        }
        if length < 2 {
            return Err(FeetechError::InvalidResponse {
                id,
                reason: format!("Length {} too short", length),
            });
        }

        // status byte + params + checksum
        let mut body = vec![0u8; length];
        self.read_exact_from(id, &mut body)?;

        let (payload, received) = body.split_at(length - 1);
        let expected = checksum(head[2..].iter().chain(payload));
        if expected != received[0] {
            return Err(FeetechError::ChecksumMismatch { id });
        }
        if payload[0] != 0 {
            return Err(FeetechError::MotorError {
                id,
                status: payload[0],
            });
        }
        Ok(payload[1..].to_vec())
    }

    /// True if the motor answers, false on timeout
    pub fn ping(&mut self, id: u8) -> Result<bool> {
        self.send(id, Instruction::Ping, &[])?;
        match self.read_status(id) {
            Ok(_) => Ok(true),
            Err(FeetechError::Timeout { .. }) => Ok(false),
            Err(e) => Err(e),
        }
    }

    pub fn write_u8(&mut self, id: u8, register: Register, value: u8) -> Result<()> {
        debug!("Write u8 to motor {}: reg={:?}, value={}", id, register, value);
        self.send(id, Instruction::Write, &[register as u8, value])?;
        self.read_status(id).map(|_| ())
    }

    fn read_bytes(&mut self, id: u8, register: Register, len: u8) -> Result<Vec<u8>> {
        self.send(id, Instruction::Read, &[register as u8, len])?;
        let data = self.read_status(id)?;
        if data.len() < len as usize {
            return Err(FeetechError::InvalidResponse {
                id,
                reason: format!("Expected {} bytes, got {}", len, data.len()),
            });
        }
        Ok(data)
    }

    pub fn read_u8(&mut self, id: u8, register: Register) -> Result<u8> {
        Ok(self.read_bytes(id, register, 1)?[0])
    }

    /// Write one signed 16-bit register on several motors in a single packet.
    /// Broadcast, so no status comes back.
    pub fn sync_write_i16(&mut self, register: Register, data: &[(u8, i16)]) -> Result<()> {
        if data.is_empty() {
            return Ok(());
        }
        let mut params = Vec::with_capacity(2 + data.len() * 3);
        params.extend_from_slice(&[register as u8, 2]);
        for &(id, value) in data {
            params.push(id);
            params.extend_from_slice(&encode_sign_magnitude(value).to_le_bytes());
        }
        debug!("Sync write to {} motors: reg={:?}", data.len(), register);
        self.send(BROADCAST_ID, Instruction::SyncWrite, &params)
    }

    pub fn set_torque(&mut self, id: u8, enabled: bool) -> Result<()> {
        self.write_u8(id, Register::TorqueEnable, enabled as u8)?;
        self.write_u8(id, Register::Lock, enabled as u8)
    }

    /// Must be called with torque disabled
    pub fn set_operating_mode(&mut self, id: u8, mode: OperatingMode) -> Result<()> {
        self.write_u8(id, Register::OperatingMode, mode as u8)
    }

    /// Internal temperature in degrees Celsius
    pub fn read_temperature(&mut self, id: u8) -> Result<u8> {
        self.read_u8(id, Register::PresentTemperature)
    }
}

fn checksum<'a>(bytes: impl IntoIterator<Item = &'a u8>) -> u8 {
    let sum = bytes.into_iter().fold(0u8, |acc, &b| acc.wrapping_add(b));
    !sum
}

fn build_packet(id: u8, instruction: Instruction, params: &[u8]) -> Vec<u8> {
    let mut packet = Vec::with_capacity(6 + params.len());
    packet.extend_from_slice(&HEADER);
    packet.extend_from_slice(&[id, (params.len() + 2) as u8, instruction as u8]);
    packet.extend_from_slice(params);
    packet.push(checksum(&packet[2..]));
    packet
}

/// Bit 15 = direction (1 = negative), bits 0-14 = magnitude
fn encode_sign_magnitude(value: i16) -> u16 {
    let magnitude = value.unsigned_abs().min(0x7FFF);
    if value < 0 { 0x8000 | magnitude } else { magnitude }
}

#[cfg(test)]
fn decode_sign_magnitude(raw: u16) -> i16 {
    let magnitude = (raw & 0x7FFF) as i16;
    if raw & 0x8000 != 0 { -magnitude } else { magnitude }
}

/// In-memory transport for bus tests: records writes, replays queued replies
#[cfg(test)]
pub(crate) mod wire {
    use std::collections::VecDeque;
    use std::io::{self, Read, Write};

    #[derive(Default)]
    pub struct MockWire {
        pub written: Vec<u8>,
        pub replies: VecDeque<u8>,
    }

    impl MockWire {
        /// Queue a well-formed status packet from `id`
        pub fn reply(&mut self, id: u8, status: u8, params: &[u8]) {
            let mut packet = vec![0xFF, 0xFF, id, (params.len() + 2) as u8, status];
            packet.extend_from_slice(params);
            let sum = packet[2..].iter().fold(0u8, |a, &b| a.wrapping_add(b));
            packet.push(!sum);
            self.replies.extend(packet);
        }
    }

    impl Read for MockWire {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if self.replies.is_empty() {
                return Err(io::Error::new(io::ErrorKind::TimedOut, "no reply"));
            }
            let n = buf.len().min(self.replies.len());
            for slot in buf.iter_mut().take(n) {
                *slot = self.replies.pop_front().unwrap_or(0);
            }
            Ok(n)
        }
    }

    impl Write for MockWire {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.written.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }
}
