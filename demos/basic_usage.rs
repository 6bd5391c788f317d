// ============================================================================
// Basic Usage Example
// ============================================================================
//
// Run with convergence tracing:
//   cargo run --example basic_usage --features logging

use ta_num::prelude::*;

fn main() -> Result<(), NumericError> {
    #[cfg(feature = "logging")]
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .init();

    println!("=== Numeric Core Example ===\n");

    // One factory per computation context
    let decimal = create_from_config(&NumConfig::decimal())?;
    let double = create_from_config(&NumConfig::double())?;

    // Closing prices of a short series
    let closes = ["101.25", "102.50", "101.75", "103.00", "104.25"];

    for factory in [&decimal, &double] {
        let prices = closes
            .iter()
            .map(|close| factory.num_of_str(close))
            .collect::<Result<Vec<_>, _>>()?;

        let count = factory.num_of(prices.len() as i64);
        let sum = prices
            .iter()
            .fold(factory.zero().clone(), |acc, price| acc.plus(price));
        let mean = sum.divided_by(&count);

        let first = &prices[0];
        let last = &prices[prices.len() - 1];
        let log_return = last.divided_by(first).log();

        println!("{} factory", factory.one().name());
        println!("  mean close:  {}", mean);
        println!("  log return:  {}", log_return);
        println!("  cube root:   {}", mean.pow_num(&factory.one().divided_by(factory.three())));
        println!();
    }

    // Square root with a precision of its own, traced step by step
    println!("sqrt(2) at 64 digits:");
    let root = decimal.two().sqrt_observed(64, &LoggingObserver)?;
    println!("  {}\n", root);

    // Undefined results become NaN instead of failing
    let undefined = decimal.one().divided_by(decimal.zero());
    println!("1 / 0 = {}", undefined);
    println!("NaN > 0 ? {}", undefined.is_greater_than(decimal.zero()));

    // Values from another context are rejected at the boundary
    if let Err(err) = decimal.ensure_produces(double.one()) {
        println!("foreign value rejected: {}", err);
    }

    // Unrepresentable integer exponents fail loudly
    let exponent = decimal.num_of_str(&"9".repeat(40))?;
    match decimal.two().try_pow_num(&exponent) {
        Ok(value) => println!("2^huge = {}", value),
        Err(err) => println!("2^huge failed: {}", err),
    }

    Ok(())
}
