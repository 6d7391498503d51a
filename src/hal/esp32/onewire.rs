//! Bit-banged 1-Wire bus for the DS18B20 on an open-drain GPIO.
//!
//! # Wiring
//!
//! - DQ → GPIO6, 4.7kΩ pull-up to 3.3V
//! - VDD → 3.3V (no parasite power)
//! - GND → GND

use crate::ds18b20::{Ds18b20, OneWireBus};
use esp_idf_hal::delay::{Ets, FreeRtos};
use esp_idf_hal::gpio::{InputOutput, InputPin, OutputPin, PinDriver};
use esp_idf_hal::peripheral::Peripheral;
use esp_idf_hal::sys::EspError;

/// DS18B20 on a bit-banged bus, waiting out conversions with FreeRTOS delays.
pub type Esp32Sensor<'d, PIN> = Ds18b20<Esp32OneWire<'d, PIN>, FreeRtos>;

/// Standard-speed 1-Wire master.
pub struct Esp32OneWire<'d, PIN>
where
    PIN: InputPin + OutputPin,
{
    pin: PinDriver<'d, PIN, InputOutput>,
}

impl<'d, PIN> Esp32OneWire<'d, PIN>
where
    PIN: InputPin + OutputPin,
{
    /// Configures `pin` as open-drain and releases the line.
    pub fn new(pin: impl Peripheral<P = PIN> + 'd) -> Result<Self, EspError> {
        let mut pin = PinDriver::input_output_od(pin)?;
        pin.set_high()?;
        Ok(Self { pin })
    }

    fn write_bit(&mut self, bit: bool) -> Result<(), EspError> {
        self.pin.set_low()?;
        if bit {
            Ets::delay_us(6);
            self.pin.set_high()?;
            Ets::delay_us(64);
        } else {
            Ets::delay_us(60);
            self.pin.set_high()?;
            Ets::delay_us(10);
        }
        Ok(())
    }

    fn read_bit(&mut self) -> Result<bool, EspError> {
        self.pin.set_low()?;
        Ets::delay_us(6);
        self.pin.set_high()?;
        Ets::delay_us(9);
        let bit = self.pin.is_high();
        Ets::delay_us(55);
        Ok(bit)
    }
}

impl<PIN> OneWireBus for Esp32OneWire<'_, PIN>
where
    PIN: InputPin + OutputPin,
{
    type Error = EspError;

    fn reset(&mut self) -> Result<bool, EspError> {
        self.pin.set_low()?;
        Ets::delay_us(480);
        self.pin.set_high()?;
        Ets::delay_us(70);
        let present = self.pin.is_low();
        Ets::delay_us(410);
        Ok(present)
    }

    fn write_byte(&mut self, byte: u8) -> Result<(), EspError> {
        for i in 0..8 {
            self.write_bit(byte & (1 << i) != 0)?;
        }
        Ok(())
    }

    fn read_byte(&mut self) -> Result<u8, EspError> {
        let mut byte = 0u8;
        for i in 0..8 {
            if self.read_bit()? {
                byte |= 1 << i;
            }
        }
        Ok(byte)
    }
}
