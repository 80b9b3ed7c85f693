use std::{
    fs::{read_dir, File},
    path::PathBuf,
};

use ocpi_pricing::{
    ocpi::{cdr::Cdr, tariff::OcpiTariff},
    pricer::{Pricer, Report},
    types::money::Price,
    Warning,
};

pub struct JsonTest {
    pub path: PathBuf,
    pub tariff: OcpiTariff,
    pub cdrs: Vec<(String, Cdr)>,
}

pub fn collect_json_tests() -> Result<Vec<JsonTest>, Box<dyn std::error::Error>> {
    let mut tests = Vec::new();

    for test_dir in read_dir(concat!(env!("CARGO_MANIFEST_DIR"), "/resources"))? {
        let test_dir_path = test_dir?.path();

        if !test_dir_path.is_dir() {
            continue;
        }

        let mut tariff = None;
        let mut cdrs = Vec::new();

        for json_file in read_dir(&test_dir_path)? {
            let file_path = json_file?.path();

            if file_path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }

            let file_stem = file_path.file_stem().unwrap();
            if file_stem == "tariff" {
                tariff = Some(serde_json::from_reader(File::open(file_path)?)?);
            } else {
                cdrs.push((
                    file_stem.to_string_lossy().to_string(),
                    serde_json::from_reader(File::open(file_path)?)?,
                ));
            }
        }

        tests.push(JsonTest {
            tariff: tariff
                .unwrap_or_else(|| panic!("no tariff.json in test directory {test_dir_path:?}")),
            cdrs,
            path: test_dir_path,
        });
    }

    Ok(tests)
}

#[macro_export]
macro_rules! tariff {
    ($name:literal) => {
        serde_json::from_str::<'_, ocpi_pricing::ocpi::tariff::OcpiTariff>(include_str!(concat!(
            "../resources/",
            $name,
            "/tariff.json"
        )))
        .unwrap()
    };
}

#[macro_export]
macro_rules! cdr {
    ($name:literal, $file:literal) => {
        serde_json::from_str::<'_, ocpi_pricing::ocpi::cdr::Cdr>(include_str!(concat!(
            "../resources/",
            $name,
            "/",
            $file,
            ".json"
        )))
        .unwrap()
    };
}

pub fn validate_cdr(cdr: &Cdr, tariff: OcpiTariff) -> Result<Report, ocpi_pricing::Error> {
    let report = Pricer::with_tariffs(cdr, &[tariff]).build_report()?;

    assert_price(cdr.total_cost, Some(report.total_cost), "total_cost");
    assert_price(cdr.total_fixed_cost, report.total_fixed_cost, "total_fixed_cost");
    assert_price(
        cdr.total_energy_cost,
        report.total_energy_cost,
        "total_energy_cost",
    );
    assert_price(cdr.total_time_cost, report.total_time_cost, "total_time_cost");
    assert_price(
        cdr.total_parking_cost,
        report.total_parking_cost,
        "total_parking_cost",
    );

    for warning in &report.warnings {
        assert!(
            !matches!(
                warning,
                Warning::TotalEnergyMismatch { .. }
                    | Warning::TotalTimeMismatch { .. }
                    | Warning::TotalParkingTimeMismatch { .. }
                    | Warning::CurrencyMismatch { .. }
            ),
            "{warning}"
        );
    }

    Ok(report)
}

/// Compare a cost reported in the CDR, when it has one, with the calculated cost.
fn assert_price(reported: Option<Price>, calculated: Option<Price>, name: &str) {
    let Some(reported) = reported else {
        return;
    };

    let calculated = calculated.unwrap_or_else(|| panic!("{name} was not calculated"));

    assert_eq!(reported.excl_vat, calculated.excl_vat, "{name} excl. VAT");

    if let Some(incl_vat) = reported.incl_vat {
        assert_eq!(Some(incl_vat), calculated.incl_vat, "{name} incl. VAT");
    }
}
