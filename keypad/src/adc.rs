//! Driver for the STM32F0 SAR ADC, just enough to feed the key table.
//!
//! The ADC is configured once for 10-bit conversions so raw counts span
//! exactly the `0..=1023` range the table resolves against, and each
//! `read` performs a single blocking one-shot conversion of the bound
//! channel.
//!
//! Creating an `AdcInput` accesses the ADC registers directly rather than
//! consuming a PAC singleton. Accepting a RegisterBlock from the user would
//! pin the caller to this crate's PAC version, which can't be guaranteed
//! next to a HAL crate. That is fine unless something else in the
//! application also reprograms the ADC.

#[cfg(feature = "stm32f0x1")]
use stm32f0::stm32f0x1 as pac;

use crate::AnalogSource;

/// ADC input channels, matching the ADC_INx pin assignments
#[derive(Clone, Copy, Debug)]
pub enum Channel {
    In0 = 0,
    In1 = 1,
    In2 = 2,
    In3 = 3,
    In4 = 4,
    In5 = 5,
    In6 = 6,
    In7 = 7,
    In8 = 8,
    In9 = 9,
    In10 = 10,
    In11 = 11,
    In12 = 12,
    In13 = 13,
    In14 = 14,
    In15 = 15,
    /// Internal temperature sensor
    In16 = 16,
    /// Internal reference voltage
    In17 = 17,
    /// VBAT/2
    In18 = 18,
}

/// One ADC channel usable as the keypad's analog source
pub struct AdcInput {
    adc: &'static pac::adc::RegisterBlock,
    channel: u8,
}

impl AdcInput {
    /// Power up and calibrate the ADC, bound to one input channel
    ///
    /// The corresponding GPIO pin must already be switched to analog mode.
    pub fn new(channel: Channel) -> Self {
        let rcc = unsafe { &*pac::RCC::ptr() };
        rcc.apb2enr.modify(|_, w| w.adcen().set_bit());

        let adc = unsafe { &*pac::ADC::ptr() };

        // PCLK/4 clocking, 10-bit right-aligned data
        adc.cfgr2.write(|w| unsafe { w.ckmode().bits(0b10) });
        adc.cfgr1.write(|w| unsafe { w.res().bits(0b01) });
        // Longest sample time; ladder taps are relatively high impedance
        adc.smpr.write(|w| unsafe { w.bits(0b111) });

        // Calibration requires ADEN clear, then the ADC can be enabled
        adc.cr.modify(|_, w| w.adcal().set_bit());
        while adc.cr.read().adcal().bit_is_set() {}
        adc.cr.modify(|_, w| w.aden().set_bit());
        while adc.isr.read().adrdy().bit_is_clear() {}

        Self {
            adc,
            channel: channel as u8,
        }
    }

    /// Run one conversion of the bound channel and block for the result
    pub fn convert(&mut self) -> u16 {
        self.adc
            .chselr
            .write(|w| unsafe { w.bits(1 << self.channel) });
        self.adc.cr.modify(|_, w| w.adstart().set_bit());
        while self.adc.isr.read().eoc().bit_is_clear() {}

        // Reading DR also clears the end-of-conversion flag
        self.adc.dr.read().bits() as u16
    }
}

impl AnalogSource for AdcInput {
    fn read(&mut self) -> u16 {
        self.convert()
    }
}
