//! Full example code for driving an SSD1306 panel from Linux userspace. This expects a 128x64
//! module on `/dev/i2c-1` at the default address 0x3C, powered from its internal charge pump, as
//! found on most Raspberry Pi breakout boards.

#[cfg(target_os = "linux")]
fn main() -> ssd1306::Result<()> {
    use std::thread::sleep;
    use std::time::Duration;

    use ssd1306::{
        Color, Config, DisplaySize, I2cInterface, I2cdev, Session, DEFAULT_ADDRESS,
        DEFAULT_BUS,
    };

    env_logger::init();

    let mut session: Session<I2cInterface<I2cdev>> = Session::new();
    session.begin_bus(
        DEFAULT_BUS,
        DEFAULT_ADDRESS,
        Config::preset(DisplaySize::Size128x64),
    )?;
    let disp = session.display_mut()?;
    let (w, h) = (i32::from(disp.width()), i32::from(disp.height()));

    // Border, a cross, and a couple of circles.
    disp.clear();
    disp.draw_rect(0, 0, w, h, Color::On);
    disp.draw_line(0, 0, w - 1, h - 1, Color::On);
    disp.draw_line(w - 1, 0, 0, h - 1, Color::On);
    disp.draw_circle(w / 2, h / 2, 20, Color::On);
    disp.fill_circle(w / 2, h / 2, 8, Color::Inverse);
    disp.flush()?;
    sleep(Duration::from_secs(2));

    // Text, at two sizes.
    disp.clear();
    disp.set_cursor(0, 0);
    disp.print("Hello, SSD1306!\n");
    disp.set_text_size(2);
    disp.print("Big\n");
    disp.set_text_size(1);
    disp.set_text_color(Color::Off, Color::On);
    disp.print("inverted text");
    disp.flush()?;
    sleep(Duration::from_secs(2));

    // Contrast and polarity.
    for &contrast in &[50, 255, 0xCF] {
        disp.set_contrast(contrast)?;
        sleep(Duration::from_millis(500));
    }
    disp.invert(true)?;
    sleep(Duration::from_secs(1));
    disp.invert(false)?;
    disp.dim(true)?;
    sleep(Duration::from_secs(1));
    disp.dim(false)?;

    // Each of the hardware scrolls, over the whole panel.
    disp.start_scroll_right(0, 7)?;
    sleep(Duration::from_secs(3));
    disp.start_scroll_left(0, 7)?;
    sleep(Duration::from_secs(3));
    disp.start_scroll_diag_right(0, 7)?;
    sleep(Duration::from_secs(3));
    disp.start_scroll_diag_left(0, 7)?;
    sleep(Duration::from_secs(3));
    disp.stop_scroll()?;

    // Scrolling garbles display RAM; rewrite it before powering off.
    disp.clear();
    disp.flush()?;
    session.end();
    Ok(())
}

#[cfg(not(target_os = "linux"))]
fn main() {
    eprintln!("this example needs a Linux i2c-dev bus");
}
