use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

const SAMPLE_EYES: [&str; 6] = [
    "--right-sph=-4",
    "--right-cyl=-1",
    "--right-axis=90",
    "--left-sph=-3.5",
    "--left-cyl=-0.5",
    "--left-axis=80",
];

fn quote_cmd() -> Command {
    let mut cmd = Command::cargo_bin("optik").unwrap();
    cmd.arg("quote")
        .args(SAMPLE_EYES)
        .args(["--price-priority", "30", "--quality-priority", "70"]);
    cmd
}

#[test]
fn test_cli_quote_ranks_three_packages() {
    quote_cmd()
        .assert()
        .success()
        .stdout(predicate::str::contains("Total power: 4.20 D"))
        .stdout(predicate::str::contains("Suggested index: 1.60 Extra Thin"))
        .stdout(predicate::str::contains("1.67"))
        .stdout(predicate::str::contains("1.74"))
        .stdout(predicate::str::contains("6,173 TL"))
        .stdout(predicate::str::contains("premium"));
}

#[test]
fn test_cli_quote_with_usage_and_subsidy() {
    let mut cmd = quote_cmd();
    cmd.args(["--usage", "ofiste bilgisayar", "--subsidy"]);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains(
            "Usage coatings: blue-cut, anti-refle, hydrophobic",
        ));
}

#[test]
fn test_cli_quote_json() {
    let mut cmd = quote_cmd();
    cmd.arg("--json");

    let output = cmd.assert().success().get_output().stdout.clone();
    let quote: serde_json::Value = serde_json::from_slice(&output).unwrap();

    assert_eq!(quote["suggestedIndex"]["index"], "1.60");
    let totals: Vec<&str> = quote["recommendations"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["totalPrice"].as_str().unwrap())
        .collect();
    assert_eq!(totals, vec!["6173", "8899", "4810"]);
}

#[test]
fn test_cli_quote_routes_strong_lenses_to_special_order() {
    let mut cmd = Command::cargo_bin("optik").unwrap();
    cmd.arg("quote").arg("--right-sph=-8").arg("--left-sph=-7.5");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains(
            "No stock lenses available for this prescription.",
        ))
        .stdout(predicate::str::contains("7-14 days"));
}

#[test]
fn test_cli_quote_reports_every_invalid_field() {
    let mut cmd = Command::cargo_bin("optik").unwrap();
    cmd.arg("quote")
        .arg("--right-sph=-25")
        .arg("--lens-type")
        .arg("trifocal");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Multiple errors occurred"))
        .stderr(predicate::str::contains("prescription.rightEye.sph"))
        .stderr(predicate::str::contains("trifocal"));
}

#[test]
fn test_cli_quote_from_input_file() {
    let temp_dir = TempDir::new().unwrap();
    let form_file = temp_dir.path().join("form.json");

    fs::write(
        &form_file,
        r#"{
  "prescription": {
    "rightEye": { "sph": -4.0, "cyl": -1.0, "axis": 90 },
    "leftEye": { "sph": -3.5, "cyl": -0.5, "axis": 80 }
  },
  "frame": { "size": "medium" },
  "lensType": "single_vision",
  "priority": { "thickness": 50, "price": 30, "quality": 70 }
}"#,
    )
    .unwrap();

    let mut cmd = Command::cargo_bin("optik").unwrap();
    cmd.arg("quote").arg("--input").arg(&form_file);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("6,173 TL"));
}

#[test]
fn test_cli_quote_rejects_malformed_input_file() {
    let temp_dir = TempDir::new().unwrap();
    let form_file = temp_dir.path().join("form.json");
    fs::write(&form_file, r#"{ "prescription": 5 }"#).unwrap();

    let mut cmd = Command::cargo_bin("optik").unwrap();
    cmd.arg("quote").arg("--input").arg(&form_file);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Invalid input: formData"))
        .stderr(predicate::str::contains("malformed request"));
}

#[test]
fn test_cli_quote_with_config_override() {
    let temp_dir = TempDir::new().unwrap();
    let config_file = temp_dir.path().join("shop.json");
    fs::write(&config_file, r#"{ "pricing": { "labor_cost": 1000 } }"#).unwrap();

    let mut cmd = quote_cmd();
    cmd.arg("--config").arg(&config_file);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("6,653 TL"));
}

#[test]
fn test_cli_bad_config_points_at_the_file() {
    let temp_dir = TempDir::new().unwrap();
    let config_file = temp_dir.path().join("shop.json");
    fs::write(&config_file, "{\n  \"cylinder_weight\": \"heavy\"\n}").unwrap();

    let mut cmd = Command::cargo_bin("optik").unwrap();
    cmd.arg("--config").arg(&config_file).arg("rules");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Config parse error"))
        .stderr(predicate::str::contains("shop.json"));
}

#[test]
fn test_cli_missing_config_file() {
    let mut cmd = Command::cargo_bin("optik").unwrap();
    cmd.arg("rules").arg("--config").arg("/nonexistent/shop.json");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read config file"));
}

#[test]
fn test_cli_thickness() {
    let mut cmd = Command::cargo_bin("optik").unwrap();
    cmd.arg("thickness")
        .arg("-4")
        .arg("--index")
        .arg("1.5")
        .arg("--diameter")
        .arg("65");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("-4.00 D @ 1.50"))
        .stdout(predicate::str::contains("Center"))
        .stdout(predicate::str::contains("1.00"));
}

#[test]
fn test_cli_thickness_json() {
    let mut cmd = Command::cargo_bin("optik").unwrap();
    cmd.args(["thickness", "-4", "--index", "1.5", "--diameter", "65", "--json"]);

    let output = cmd.assert().success().get_output().stdout.clone();
    let result: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(result["center"], 1.0);
    assert!((result["edge"].as_f64().unwrap() - 5.225).abs() < 1e-9);
}

#[test]
fn test_cli_thickness_rejects_bad_index() {
    let mut cmd = Command::cargo_bin("optik").unwrap();
    cmd.args(["thickness", "-4", "--index", "0.9"]);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Invalid input: index"));
}

#[test]
fn test_cli_improvement() {
    let mut cmd = Command::cargo_bin("optik").unwrap();
    cmd.args(["improvement", "-4", "--index", "1.67", "--diameter", "65"]);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("20.5% thinner than 1.50"));
}

#[test]
fn test_cli_index() {
    let mut cmd = Command::cargo_bin("optik").unwrap();
    cmd.args(["index", "4.2"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("1.60 Extra Thin"));

    let mut cmd = Command::cargo_bin("optik").unwrap();
    cmd.args(["index", "4.2", "--priority", "thin"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("1.67 Ultra Thin"));
}

#[test]
fn test_cli_index_accepts_negative_diopters() {
    let mut cmd = Command::cargo_bin("optik").unwrap();
    cmd.args(["index", "-0.75"]);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("1.50 Standard"));
}

#[test]
fn test_cli_index_rejects_unknown_priority() {
    let mut cmd = Command::cargo_bin("optik").unwrap();
    cmd.args(["index", "4.2", "--priority", "fastest"]);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("unknown priority 'fastest'"));
}

#[test]
fn test_cli_coatings() {
    let mut cmd = Command::cargo_bin("optik").unwrap();
    cmd.args(["coatings", "gece araba", "--lens-type", "progresif"]);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("anti-refle"))
        .stdout(predicate::str::contains("drive"));
}

#[test]
fn test_cli_coatings_none_found() {
    let mut cmd = Command::cargo_bin("optik").unwrap();
    cmd.args(["coatings", "kitap"]);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("No coatings suggested."));
}

#[test]
fn test_cli_rules() {
    let mut cmd = Command::cargo_bin("optik").unwrap();
    cmd.arg("rules");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Cylinder weight: 0.2"))
        .stdout(predicate::str::contains("gece-surus"))
        .stdout(predicate::str::contains("VAT 20%"));
}

#[test]
fn test_cli_rules_json_round_trips_through_config() {
    let temp_dir = TempDir::new().unwrap();
    let config_file = temp_dir.path().join("rules.json");

    let mut cmd = Command::cargo_bin("optik").unwrap();
    cmd.args(["rules", "--json"]);
    let output = cmd.assert().success().get_output().stdout.clone();
    fs::write(&config_file, &output).unwrap();

    let mut cmd = quote_cmd();
    cmd.arg("--config").arg(&config_file);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("6,173 TL"));
}
