//! DS18B20 1-Wire temperature sensor protocol.
//!
//! The byte-level bus is abstracted by [`OneWireBus`] so the protocol (reset,
//! skip ROM, convert, read scratchpad, CRC check) runs unchanged over a
//! bit-banged GPIO on the ESP32 and over a scripted bus in tests. A single
//! sensor on the bus is assumed, so every transaction uses Skip ROM.

use crate::traits::TemperatureSensor;
use embedded_hal::delay::DelayNs;

/// Skip ROM: address every device on the bus.
pub const CMD_SKIP_ROM: u8 = 0xCC;
/// Start a temperature conversion.
pub const CMD_CONVERT_T: u8 = 0x44;
/// Read the 9-byte scratchpad.
pub const CMD_READ_SCRATCHPAD: u8 = 0xBE;

/// Worst-case 12-bit conversion time.
pub const CONVERSION_MS: u32 = 750;

/// Scratchpad length including the CRC byte.
pub const SCRATCHPAD_LEN: usize = 9;

/// Byte-level 1-Wire bus.
pub trait OneWireBus {
    /// Bus error type.
    type Error: core::fmt::Debug;

    /// Issues a reset pulse. Returns true if a device answered with presence.
    fn reset(&mut self) -> Result<bool, Self::Error>;

    /// Writes one byte, LSB first.
    fn write_byte(&mut self, byte: u8) -> Result<(), Self::Error>;

    /// Reads one byte, LSB first.
    fn read_byte(&mut self) -> Result<u8, Self::Error>;
}

/// Reason a reading was rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Ds18b20Error<E> {
    /// Bus transport failed.
    Bus(E),
    /// No presence pulse after reset.
    NoDevice,
    /// Scratchpad read back as all ones (line floating or held high).
    Disconnected,
    /// Scratchpad CRC mismatch.
    Crc,
}

/// Dallas/Maxim CRC-8 (polynomial 0x31, reflected as 0x8C).
///
/// Running it over a full scratchpad including its CRC byte yields zero.
pub fn crc8(data: &[u8]) -> u8 {
    let mut crc = 0u8;
    for &byte in data {
        let mut b = byte;
        for _ in 0..8 {
            let mix = (crc ^ b) & 0x01;
            crc >>= 1;
            if mix != 0 {
                crc ^= 0x8C;
            }
            b >>= 1;
        }
    }
    crc
}

/// Decodes a scratchpad to whole degrees Celsius, truncated toward zero.
pub fn decode_scratchpad<E>(data: &[u8; SCRATCHPAD_LEN]) -> Result<i16, Ds18b20Error<E>> {
    if data.iter().all(|&b| b == 0xFF) {
        return Err(Ds18b20Error::Disconnected);
    }
    if crc8(data) != 0 {
        return Err(Ds18b20Error::Crc);
    }
    Ok(i16::from_le_bytes([data[0], data[1]]) / 16)
}

/// DS18B20 driver on a dedicated bus.
pub struct Ds18b20<W, D> {
    bus: W,
    delay: D,
}

impl<W: OneWireBus, D: DelayNs> Ds18b20<W, D> {
    /// Wraps a bus holding a single sensor.
    pub fn new(bus: W, delay: D) -> Self {
        Self { bus, delay }
    }

    fn command(&mut self, cmd: u8) -> Result<(), Ds18b20Error<W::Error>> {
        if !self.bus.reset().map_err(Ds18b20Error::Bus)? {
            return Err(Ds18b20Error::NoDevice);
        }
        self.bus.write_byte(CMD_SKIP_ROM).map_err(Ds18b20Error::Bus)?;
        self.bus.write_byte(cmd).map_err(Ds18b20Error::Bus)
    }

    /// Runs one blocking conversion and returns the scratchpad.
    pub fn read_scratchpad(&mut self) -> Result<[u8; SCRATCHPAD_LEN], Ds18b20Error<W::Error>> {
        self.command(CMD_CONVERT_T)?;
        self.delay.delay_ms(CONVERSION_MS);
        self.command(CMD_READ_SCRATCHPAD)?;

        let mut data = [0u8; SCRATCHPAD_LEN];
        for byte in data.iter_mut() {
            *byte = self.bus.read_byte().map_err(Ds18b20Error::Bus)?;
        }
        Ok(data)
    }

    /// Releases the bus and delay.
    pub fn release(self) -> (W, D) {
        (self.bus, self.delay)
    }
}

impl<W: OneWireBus, D: DelayNs> TemperatureSensor for Ds18b20<W, D> {
    type Error = Ds18b20Error<W::Error>;

    fn read_celsius(&mut self) -> Result<i16, Self::Error> {
        let data = self.read_scratchpad()?;
        decode_scratchpad(&data)
    }
}
