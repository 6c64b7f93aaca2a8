mod fixtures;

use approx::assert_abs_diff_eq;
use fixtures::{RefRange, assert_series, load_records, load_ref_values};
use streamta::{Ao, AoConfig, Candle};

// Tulip Indicators tests/extra.txt, AO 5/34 on 99 high/low bars.
fn candles() -> Vec<Candle> {
    load_records::<RefRange>("ao-candles.csv")
        .iter()
        .map(RefRange::candle)
        .collect()
}

#[test]
fn ao_5_34_matches_tulip() {
    let reference = load_ref_values("ao-5-34.csv");
    let mut ao: Ao = Ao::new(AoConfig::default_5_34());

    let results = ao.updates(candles(), false);

    assert_eq!(ao.required_inputs(), 34);
    assert_eq!(reference.len(), results.len() - 33);
    assert_series("AO(5, 34)", &results, &reference, 4);
}

#[test]
fn ao_replace_restores_value() {
    let mut ao: Ao = Ao::new(AoConfig::default_5_34());
    ao.updates(candles(), false);

    let latest = Candle::hlc(9000.0, 0.0, 4500.0);
    let other = Candle::hlc(2000.0, -2000.0, 0.0);

    assert_abs_diff_eq!(ao.add(latest).unwrap(), 749.69, epsilon = 0.005);
    assert_abs_diff_eq!(ao.replace(other).unwrap(), -17.96, epsilon = 0.005);
    assert_abs_diff_eq!(ao.replace(latest).unwrap(), 749.69, epsilon = 0.005);
}
