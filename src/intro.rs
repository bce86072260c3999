//! The welcome tour shown before first use.

use crate::ui;

const SLIDES: [&str; 3] = [
    "Keep an eye on global interest rates at a glance.",
    "Anticipate changes with probability metrics.",
    "Get detailed analytics and forecasts.",
];

pub fn run() {
    println!(
        "{}\n",
        ui::style_text("Welcome to RateWatch", ui::StyleType::Title)
    );
    for (i, slide) in SLIDES.iter().enumerate() {
        println!("  {}. {slide}", i + 1);
    }
    println!(
        "\n{}",
        ui::style_text("Run `ratewatch rates` to start exploring.", ui::StyleType::Subtle)
    );
}
