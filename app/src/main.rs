#![no_main]
#![no_std]

use cortex_m;
use cortex_m_rt::entry;
use panic_halt as _;

use stm32f0xx_hal as hal;

use analog_keypad::adc::{AdcInput, Channel};
use analog_keypad::table::AnalogKeypad;

use crate::hal::pac;
use crate::hal::pac::interrupt;
use crate::hal::prelude::*;

mod serial;

// A four-key ladder on ADC_IN0. Values are the divider taps measured on the
// rev A board; taps land ~200 counts apart so resistor tolerance is not a
// concern even without debouncing.
static KEY_NAMES: [&str; 4] = ["up", "down", "left", "right"];
static KEY_VALUES: [u16; 4] = [148, 329, 505, 741];

#[entry]
fn main() -> ! {
    let dp = pac::Peripherals::take().unwrap();

    let mut flash = dp.FLASH;
    let mut rcc = dp.RCC.configure().sysclk(48.mhz()).freeze(&mut flash);
    let gpioa = dp.GPIOA.split(&mut rcc);
    let gpiob = dp.GPIOB.split(&mut rcc);

    // A library requiring a critical section to set a gpio AF register is bad and I just won't.
    let fake_cs = unsafe { cortex_m::interrupt::CriticalSection::new() };

    // Ladder sense line
    let _sense = gpioa.pa0.into_analog(&fake_cs);

    let tx_pin = gpiob.pb6.into_alternate_af0(&fake_cs);
    let rx_pin = gpiob.pb7.into_alternate_af0(&fake_cs);
    let uart = hal::serial::Serial::usart1(dp.USART1, (tx_pin, rx_pin), 115200.bps(), &mut rcc);
    serial::uart1::init(uart, 4);

    let mut keypad = AnalogKeypad::new(AdcInput::new(Channel::In0));
    keypad.register_keys(&KEY_NAMES, &KEY_VALUES).ok();

    loop {
        let key = keypad.wait_pressed();

        let mut writer = serial::uart1::writer();
        core::fmt::write(&mut writer, format_args!("{}\r\n", key)).ok();

        keypad.wait_unpressed();
    }
}
