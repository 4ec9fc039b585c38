//! premium-runner: headless premium calculator.
//!
//! Usage:
//!   premium-runner --input demos/operator.json
//!   premium-runner --input demos/nops.json --data-dir ./data --json
//!   premium-runner --input demos/operator.json --reception-minutes 3.5
//!   premium-runner --list positions

use anyhow::{bail, Result};
use premium_core::{
    calculator::PremiumCalculator,
    coefficients::{OperationClass, SPEED_DELIVERY, SPEED_RECEPTION},
    config::PremiumConfig,
    input::CalculationInput,
    operations::lines_of_class,
    result::{CalculationResult, LineKind},
    validation::validate_input,
};
use std::env;
use std::path::Path;

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let data_dir = arg_value(&args, "--data-dir").unwrap_or("./data");
    let json_output = args.iter().any(|a| a == "--json");

    let config = if Path::new(data_dir).is_dir() {
        PremiumConfig::load(data_dir)?
    } else {
        log::warn!("data dir {data_dir} not found, using built-in catalog");
        PremiumConfig::builtin()
    };

    if let Some(what) = arg_value(&args, "--list") {
        return list(&config, what);
    }

    let Some(input_path) = arg_value(&args, "--input") else {
        bail!("missing --input <file>; see --list positions for position ids");
    };
    let mut input = CalculationInput::from_file(input_path)?;

    if let Some(minutes) = parse_arg::<f64>(&args, "--reception-minutes")? {
        let coeff = config.rules.speed.reception_coefficient(Some(minutes));
        input.team_coefficients.insert(SPEED_RECEPTION.into(), coeff);
    }
    if let Some(minutes) = parse_arg::<f64>(&args, "--delivery-minutes")? {
        let coeff = config.rules.speed.delivery_coefficient(Some(minutes));
        input.team_coefficients.insert(SPEED_DELIVERY.into(), coeff);
    }

    let soft_warnings = validate_input(&config, &input)?;
    let calculator = PremiumCalculator::new(config);
    let result = calculator.calculate(&input)?;

    if json_output {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        for warning in &soft_warnings {
            println!("note: {warning}");
        }
        print_report(calculator.config(), &input, &result);
    }

    Ok(())
}

fn list(config: &PremiumConfig, what: &str) -> Result<()> {
    match what {
        "positions" => {
            for p in config.positions_sorted() {
                let kpi = if p.has_kpi() { p.kpi.join(", ") } else { "none".into() };
                println!("{} {:<18} {}  (KPI: {kpi})", p.emoji, p.id, p.name);
            }
        }
        "operations" => {
            for op in config.operations_sorted() {
                println!(
                    "{:>2}. {} {:<38} {:<18} class {}",
                    op.id, op.emoji, op.name, op.rate_label, op.operation_class
                );
            }
        }
        other => bail!("unknown list '{other}', expected positions or operations"),
    }
    Ok(())
}

fn print_report(config: &PremiumConfig, input: &CalculationInput, result: &CalculationResult) {
    println!("Premium calculation: {}", result.position_name);
    if result.real_salary > 0.0 {
        println!(
            "  salary:  {} × {} = {}",
            format_money(result.base_salary),
            result.position_rate,
            format_money(result.real_salary)
        );
    }
    println!();

    let classes = [
        (OperationClass::Plain, "No coefficient"),
        (OperationClass::Service, "Service coefficient"),
        (OperationClass::ReceptionSpeed, "Reception speed coefficient"),
        (OperationClass::DeliverySpeed, "Delivery speed coefficient"),
    ];
    for (class, title) in classes {
        let lines: Vec<_> = lines_of_class(config, &result.operation_lines, class).collect();
        if lines.is_empty() {
            continue;
        }
        println!("{title}:");
        for line in lines {
            println!(
                "  {} {:<38} {:>10} × {:<4} = {}",
                line.emoji,
                line.name,
                format_money(line.base_amount),
                line.coefficient,
                format_money(line.final_amount)
            );
        }
    }
    let pvz_id = config.rules.pvz.operation_id;
    if result
        .operation_lines
        .iter()
        .any(|line| line.kind == LineKind::Operation { operation_id: pvz_id })
    {
        println!(
            "  PVZ: {}; {}",
            input.pvz.schedule.label(),
            input.pvz.rating.label()
        );
    }
    for line in &result.operation_lines {
        if matches!(line.kind, LineKind::Efficiency | LineKind::Subordinates) {
            println!(
                "  {} {:<38} {:<18} {}",
                line.emoji,
                line.name,
                line.rate_label,
                format_money(line.final_amount)
            );
        }
    }
    println!("Operation bonus: {}", format_money(result.operation_bonus));

    if !result.kpi_lines.is_empty() {
        println!();
        println!("KPI:");
        for line in &result.kpi_lines {
            println!(
                "  {} {:<20} {:>7} weight {:.2} coeff {:.2} = {}",
                line.emoji,
                line.name,
                format_percent(line.percent),
                line.weight,
                line.coefficient,
                format_money(line.bonus)
            );
        }
    }
    println!("KPI bonus: {}", format_money(result.kpi_bonus));

    for warning in &result.warnings {
        println!("{warning}");
    }
    println!();
    println!("TOTAL PREMIUM: {}", format_money(result.total_premium));
}

/// Whole roubles with space-separated thousands, e.g. `12 345₽`.
fn format_money(amount: f64) -> String {
    let rounded = amount.round() as i64;
    let digits = rounded.unsigned_abs().to_string();
    let mut grouped = String::new();
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(' ');
        }
        grouped.push(ch);
    }
    let sign = if rounded < 0 { "-" } else { "" };
    format!("{sign}{grouped}₽")
}

fn format_percent(value: f64) -> String {
    format!("{value:.1}%")
}

fn arg_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

fn parse_arg<T: std::str::FromStr>(args: &[String], flag: &str) -> Result<Option<T>> {
    match arg_value(args, flag) {
        Some(raw) => match raw.parse() {
            Ok(value) => Ok(Some(value)),
            Err(_) => bail!("invalid value for {flag}: {raw}"),
        },
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn money_groups_thousands() {
        assert_eq!(format_money(0.0), "0₽");
        assert_eq!(format_money(600.0), "600₽");
        assert_eq!(format_money(7500.0), "7 500₽");
        assert_eq!(format_money(1_234_567.4), "1 234 567₽");
    }

    #[test]
    fn percent_has_one_decimal() {
        assert_eq!(format_percent(95.0), "95.0%");
    }
}
