use std::error::Error;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use dotenv::dotenv;
use shift_reg_engine::common::error::DriverError;
use shift_reg_engine::common::logger::init_logger;
use shift_reg_engine::common::setting::{self, Settings};
use shift_reg_engine::driver::factory::shift_reg_factory::ShiftRegFactory;
use shift_reg_engine::driver::factory::Factory;
use shift_reg_engine::driver::shift_reg::shift_reg_buffered::ShiftRegBuffered;
use shift_reg_engine::driver::traits::ShiftRegister;
use shift_reg_engine::{debug, info};

const LOG_TAG: &str = "main";

fn main() -> Result<(), Box<dyn Error>> {
    dotenv().ok();

    init_logger()?;
    // read again so a broken config file stops the program instead of falling back to defaults
    let settings = Settings::load()?;
    info!(LOG_TAG, "config loaded, env: {}", settings.env.env);
    debug!(LOG_TAG, "config: {:?}", settings);

    setting::set_edge_delay(settings.gpio.edge_delay())?;

    let running = Arc::new(AtomicBool::new(true));
    let running_handler = Arc::clone(&running);
    ctrlc::set_handler(move || running_handler.store(false, Ordering::SeqCst))?;

    let shift_reg = ShiftRegFactory::new().create(&settings)?;
    running_light(&shift_reg, &running, Duration::from_millis(settings.demo.step_ms))?;

    shift_reg.clear()?;
    info!(LOG_TAG, "stopped, releasing register");
    Ok(())
}

/// Walk a single lit output along the chain until interrupted
fn running_light<R: ShiftRegister>(
    shift_reg: &ShiftRegBuffered<R>,
    running: &AtomicBool,
    step: Duration,
) -> Result<(), DriverError> {
    let capacity = shift_reg.get_capacity();
    info!(LOG_TAG, "running light over {} outputs, step {:?}", capacity, step);

    let mut pos = 0;
    while running.load(Ordering::SeqCst) {
        let prev = (pos + capacity - 1) % capacity;
        shift_reg.set_buf_bit(prev, 0)?;
        shift_reg.set_buf_bit(pos, 1)?;
        shift_reg.write_buffer()?;

        pos = (pos + 1) % capacity;
        thread::sleep(step);
    }
    Ok(())
}
