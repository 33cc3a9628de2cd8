//! LEDC channel and status-pin drivers plus peripheral initialisation.

pub mod hw_init;
pub mod led_pin;
pub mod status_led;
