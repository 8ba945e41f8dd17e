use chrono::NaiveDate;
use comfy_table::{presets::UTF8_FULL, Cell, CellAlignment, Row, Table};
use optik::{
    Coating, FrameSize, IndexSuggestion, LensIndex, Quote, Recommendation, RuleTables,
    SpecialOrderQuote, ThicknessResult,
};
use rust_decimal::Decimal;

pub struct Formatter {}

impl Default for Formatter {
    fn default() -> Self {
        Self::new()
    }
}

impl Formatter {
    pub fn new() -> Self {
        Self {}
    }

    pub fn format_quote(&self, quote: &Quote, date: NaiveDate) -> String {
        let mut output = String::new();

        output.push_str(&format!("Quote of {}\n", date.format("%Y-%m-%d")));
        output.push_str(&format!("Total power: {:.2} D\n", quote.total_power));
        output.push_str(&format!(
            "Suggested index: {} ({})\n",
            index_label(quote.suggested_index.index),
            quote.suggested_index.reason
        ));
        if !quote.usage_coatings.is_empty() {
            output.push_str(&format!(
                "Usage coatings: {}\n",
                coating_list(&quote.usage_coatings)
            ));
        }
        output.push('\n');

        if quote.recommendations.is_empty() {
            output.push_str("No stock lenses available for this prescription.\n");
        } else {
            output.push_str(&self.format_recommendations(&quote.recommendations));
            output.push('\n');
        }

        if !quote.special_orders.is_empty() {
            output.push('\n');
            output.push_str(&self.format_special_orders(&quote.special_orders));
            output.push('\n');
        }

        output
    }

    fn format_recommendations(&self, recommendations: &[Recommendation]) -> String {
        let mut table = Table::new();
        table.load_preset(UTF8_FULL);
        table.set_header(Row::from(vec![
            Cell::new("#"),
            Cell::new("Index"),
            Cell::new("Thickness"),
            Cell::new("Thinner"),
            Cell::new("Coatings"),
            Cell::new("Category"),
            Cell::new("Rating"),
            Cell::new("Total").set_alignment(CellAlignment::Right),
        ]));

        for (i, recommendation) in recommendations.iter().enumerate() {
            table.add_row(Row::from(vec![
                Cell::new(i + 1),
                Cell::new(&recommendation.lens_index),
                Cell::new(format!(
                    "{:.2} mm ({})",
                    recommendation.thickness,
                    recommendation.risk.label()
                )),
                Cell::new(format!("{:.1}%", recommendation.improvement)),
                Cell::new(coating_list(&recommendation.coatings)),
                Cell::new(recommendation.category),
                Cell::new(format!("{:.1}", recommendation.rating)),
                Cell::new(format_money(recommendation.total_price))
                    .set_alignment(CellAlignment::Right),
            ]));
        }

        table.to_string()
    }

    fn format_special_orders(&self, special_orders: &[SpecialOrderQuote]) -> String {
        let mut table = Table::new();
        table.load_preset(UTF8_FULL);
        table.set_header(Row::from(vec![
            Cell::new("Special order"),
            Cell::new("Power"),
            Cell::new("Delivery"),
            Cell::new("Total").set_alignment(CellAlignment::Right),
        ]));

        for special in special_orders {
            table.add_row(Row::from(vec![
                Cell::new(&special.lens_index),
                Cell::new(format!("{:+.2} D", special.special_order.power)),
                Cell::new(format!(
                    "{}-{} days",
                    special.special_order.min_days, special.special_order.max_days
                )),
                Cell::new(format_money(special.total_price)).set_alignment(CellAlignment::Right),
            ]));
        }

        table.to_string()
    }

    pub fn format_thickness(&self, power: f64, index: f64, result: &ThicknessResult) -> String {
        let mut table = Table::new();
        table.load_preset(UTF8_FULL);
        table.set_header(Row::from(vec![
            Cell::new(format!("{:+.2} D @ {:.2}", power, index)),
            Cell::new("mm").set_alignment(CellAlignment::Right),
        ]));
        for (name, value) in [
            ("Center", result.center),
            ("Edge", result.edge),
            ("Sag", result.sag),
            ("Diameter", result.diameter),
        ] {
            table.add_row(Row::from(vec![
                Cell::new(name),
                Cell::new(format!("{:.2}", value)).set_alignment(CellAlignment::Right),
            ]));
        }
        format!("{}\n", table)
    }

    pub fn format_improvement(&self, power: f64, index: f64, percent: f64) -> String {
        format!(
            "{:+.2} D in {:.2}: {:.1}% thinner than 1.50\n",
            power, index, percent
        )
    }

    pub fn format_index(&self, total_diopter: f64, suggestion: &IndexSuggestion) -> String {
        format!(
            "{}\n  {}\n  evaluated at {:.2} D for a total of {:.2} D\n",
            index_label(suggestion.index),
            suggestion.reason,
            suggestion.evaluated_diopter,
            total_diopter
        )
    }

    pub fn format_coatings(&self, coatings: &[Coating], tables: &RuleTables) -> String {
        if coatings.is_empty() {
            return "No coatings suggested.\n".to_string();
        }

        let mut table = Table::new();
        table.load_preset(UTF8_FULL);
        table.set_header(Row::from(vec![
            Cell::new("Coating"),
            Cell::new("Description"),
            Cell::new("Price").set_alignment(CellAlignment::Right),
        ]));
        for coating in coatings {
            table.add_row(Row::from(vec![
                Cell::new(coating.id()),
                Cell::new(coating.label()),
                Cell::new(format_money(tables.coating_price(*coating)))
                    .set_alignment(CellAlignment::Right),
            ]));
        }
        format!("{}\n", table)
    }

    pub fn format_rules(&self, tables: &RuleTables) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "Cylinder weight: {}\nSpecial order from {:.2} D ({}-{} days)\n\n",
            tables.cylinder_weight,
            tables.special_order.threshold,
            tables.special_order.min_days,
            tables.special_order.max_days
        ));

        let mut frame_table = Table::new();
        frame_table.load_preset(UTF8_FULL);
        frame_table.set_header(Row::from(vec!["Frame", "Lens diameter", "Thickness factor"]));
        for size in FrameSize::ALL {
            frame_table.add_row(Row::from(vec![
                size.id().to_string(),
                format!("{:.0} mm", size.diameter()),
                format!("x{:.2}", size.thickness_multiplier()),
            ]));
        }
        output.push_str(&format!("{}\n\n", frame_table));

        let mut index_table = Table::new();
        index_table.load_preset(UTF8_FULL);
        index_table.set_header(Row::from(vec!["Up to", "Index", "Reason"]));
        for rule in &tables.index_rules {
            index_table.add_row(Row::from(vec![
                bound(rule.max_diopter),
                rule.index.key().to_string(),
                rule.reason.clone(),
            ]));
        }
        output.push_str(&format!("{}\n\n", index_table));

        let mut band_table = Table::new();
        band_table.load_preset(UTF8_FULL);
        band_table.set_header(Row::from(vec!["Up to", "Candidates"]));
        for band in &tables.candidate_bands {
            let indices: Vec<&str> = band.indices.iter().map(|i| i.key()).collect();
            band_table.add_row(Row::from(vec![bound(band.max_power), indices.join(", ")]));
        }
        output.push_str(&format!("{}\n\n", band_table));

        let mut coating_table = Table::new();
        coating_table.load_preset(UTF8_FULL);
        coating_table.set_header(Row::from(vec!["Scenario", "Keywords", "Coatings"]));
        for rule in &tables.coating_rules {
            coating_table.add_row(Row::from(vec![
                rule.scenario.clone(),
                rule.keywords.join(", "),
                coating_list(&rule.coatings),
            ]));
        }
        output.push_str(&format!("{}\n\n", coating_table));

        let pricing = &tables.pricing;
        let mut price_table = Table::new();
        price_table.load_preset(UTF8_FULL);
        price_table.set_header(Row::from(vec![
            Cell::new("Price"),
            Cell::new("Amount").set_alignment(CellAlignment::Right),
        ]));
        for entry in &pricing.base_prices {
            price_table.add_row(Row::from(vec![
                Cell::new(format!("Base {}", entry.index)),
                Cell::new(format_money(entry.price)).set_alignment(CellAlignment::Right),
            ]));
        }
        for band in &pricing.price_bands {
            price_table.add_row(Row::from(vec![
                Cell::new(format!("Band {} {:.2}..{:.2} D", band.index, band.min, band.max)),
                Cell::new(format_money(band.price)).set_alignment(CellAlignment::Right),
            ]));
        }
        for entry in &pricing.coating_prices {
            price_table.add_row(Row::from(vec![
                Cell::new(format!("Coating {}", entry.coating)),
                Cell::new(format_money(entry.price)).set_alignment(CellAlignment::Right),
            ]));
        }
        for rule in &tables.lens_types {
            price_table.add_row(Row::from(vec![
                Cell::new(format!("Lens type {}", rule.lens_type)),
                Cell::new(format_money(rule.surcharge)).set_alignment(CellAlignment::Right),
            ]));
        }
        price_table.add_row(Row::from(vec![
            Cell::new("Labor"),
            Cell::new(format_money(pricing.labor_cost)).set_alignment(CellAlignment::Right),
        ]));
        price_table.add_row(Row::from(vec![
            Cell::new("Subsidy"),
            Cell::new(format_money(pricing.subsidy)).set_alignment(CellAlignment::Right),
        ]));
        output.push_str(&format!("{}\n", price_table));
        output.push_str(&format!(
            "Power markup {}% per diopter, VAT {}%\n",
            (pricing.power_markup * Decimal::ONE_HUNDRED).normalize(),
            (pricing.vat_rate * Decimal::ONE_HUNDRED).normalize()
        ));

        output
    }
}

fn index_label(index: LensIndex) -> String {
    format!(
        "{} (about {:.0}% of a 1.50 lens)",
        index.label(),
        index.nominal_thinning() * 100.0
    )
}

fn coating_list(coatings: &[Coating]) -> String {
    if coatings.is_empty() {
        return "-".to_string();
    }
    coatings
        .iter()
        .map(|c| c.id())
        .collect::<Vec<_>>()
        .join(", ")
}

fn bound(max: Option<f64>) -> String {
    match max {
        Some(max) => format!("{:.2} D", max),
        None => "any".to_string(),
    }
}

/// Whole currency units with thousand separators, e.g. `6,173 TL`
pub fn format_money(amount: Decimal) -> String {
    let rounded = optik::rules::pricing::round_whole(amount);
    let digits = rounded.abs().trunc().to_string();

    let mut grouped = String::new();
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    format!("{}{} TL", sign, grouped)
}
