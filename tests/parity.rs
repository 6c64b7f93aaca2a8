mod fixtures;

use approx::assert_relative_eq;
use fixtures::random_walk;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::num::NonZero;
use streamta::*;

fn nz(n: usize) -> NonZero<usize> {
    NonZero::new(n).unwrap()
}

fn assert_tracks_agree(name: &str, bar: usize, fast: Option<Vec<f64>>, exact: Option<Vec<f64>>) {
    match (fast, exact) {
        (None, None) => {}
        (Some(fast), Some(exact)) => {
            for (f, e) in fast.into_iter().zip(exact) {
                assert_relative_eq!(f, e, epsilon = 1e-9, max_relative = 1e-9);
            }
        }
        (f, e) => panic!("{name}: stability differs at bar {bar}: f64={f:?}, decimal={e:?}"),
    }
}

/// Ticks delivered for bar `i`: every seventh bar arrives as an opening
/// tick, a tick halfway to the close and the closed bar. The others arrive
/// closed.
fn ticks<N: Num>(bar: Candle<N>, i: usize) -> Vec<Candle<N>> {
    if i % 7 != 3 {
        return vec![bar];
    }

    let two = N::from_usize(2);
    let half = |from: N, to: N| (from + to).checked_div(two).unwrap();
    let open = Candle::new(bar.open, bar.open, bar.open, bar.open, N::ZERO);
    let mid = Candle::new(
        bar.open,
        half(bar.open, bar.high),
        half(bar.open, bar.low),
        half(bar.open, bar.close),
        half(N::ZERO, bar.volume),
    );
    vec![open, mid, bar]
}

/// Feeds the random walk through the f64 and Decimal track of the same
/// indicator and compares every output, including each replaced tick.
///
/// `|c| input` maps a candle of either track to the indicator input and
/// `|v| [..]` projects an output to its components.
macro_rules! parity_test {
    ($name:ident, $ind:ident, $config:expr, |$c:ident| $input:expr, |$v:ident| $project:expr) => {
        #[test]
        fn $name() {
            let config = $config;
            let mut fast: $ind<f64> = $ind::new(config);
            let mut exact: $ind<Decimal> = $ind::new(config);

            let bars = random_walk::<f64>().into_iter().zip(random_walk::<Decimal>());
            for (i, (fast_bar, exact_bar)) in bars.enumerate() {
                let steps = ticks(fast_bar, i).into_iter().zip(ticks(exact_bar, i));
                for (step, (fast_tick, exact_tick)) in steps.enumerate() {
                    let replace = step > 0;
                    let fast_value = {
                        let $c = fast_tick;
                        fast.update($input, replace)
                    };
                    let exact_value = {
                        let $c = exact_tick;
                        exact.update($input, replace)
                    };
                    assert_tracks_agree(
                        stringify!($name),
                        i,
                        fast_value.map(|$v| Vec::from($project)),
                        exact_value.map(|$v| $project.into_iter().map(Num::to_f64).collect()),
                    );
                }
            }
        }
    };
}

parity_test!(sma_20, Sma, SmaConfig::new(nz(20)), |c| c.close, |v| [v]);
parity_test!(ema_20, Ema, EmaConfig::new(nz(20)), |c| c.close, |v| [v]);
parity_test!(dema_10, Dema, DemaConfig::new(nz(10)), |c| c.close, |v| [v]);
parity_test!(wma_10, Wma, WmaConfig::new(nz(10)), |c| c.close, |v| [v]);
parity_test!(wsma_14, Wsma, WsmaConfig::new(nz(14)), |c| c.close, |v| [v]);
parity_test!(spencer, Spencer, SpencerConfig, |c| c.close, |v| [v]);
parity_test!(
    dma_3_8,
    Dma,
    DmaConfig::new(nz(3), nz(8)),
    |c| c.close,
    |v| [v.short(), v.long()]
);
parity_test!(
    linreg_20,
    LinReg,
    LinRegConfig::new(nz(20)),
    |c| c.close,
    |v| [v.slope, v.intercept, v.fitted]
);
parity_test!(rsi_14, Rsi, RsiConfig::new(nz(14)), |c| c.close, |v| [v]);
parity_test!(
    stoch_rsi_14,
    StochRsi,
    StochRsiConfig::new(nz(14)),
    |c| c.close,
    |v| [v]
);
parity_test!(mom_10, Mom, MomConfig::new(nz(10)), |c| c.close, |v| [v]);
parity_test!(roc_10, Roc, RocConfig::new(nz(10)), |c| c.close, |v| [v]);
parity_test!(
    macd_12_26_9,
    Macd,
    MacdConfig::default_12_26_9(),
    |c| c.close,
    |v| [v.macd(), v.signal(), v.histogram()]
);
parity_test!(
    cg_10_10,
    Cg,
    CgConfig::new(nz(10), nz(10)),
    |c| c.close,
    |v| [v.cg(), v.signal()]
);
parity_test!(
    bb_20,
    Bb,
    BbConfig::new(nz(20)),
    |c| c.close,
    |v| [v.upper(), v.middle(), v.lower()]
);
parity_test!(bbw_20, Bbw, BbConfig::new(nz(20)), |c| c.close, |v| [v]);
parity_test!(mad_10, Mad, MadConfig::new(nz(10)), |c| c.close, |v| [v]);
parity_test!(iqr_12, Iqr, IqrConfig::new(nz(12)), |c| c.close, |v| [v]);
parity_test!(
    period_10,
    Period,
    PeriodConfig::new(nz(10)),
    |c| c.close,
    |v| [v.lowest(), v.highest()]
);
parity_test!(tr, Tr, TrConfig, |c| c, |v| [v]);
parity_test!(atr_14, Atr, AtrConfig::new(nz(14)), |c| c, |v| [v]);
parity_test!(cci_20, Cci, CciConfig::new(nz(20)), |c| c, |v| [v]);
parity_test!(
    willr_14,
    WilliamsR,
    WilliamsRConfig::new(nz(14)),
    |c| c,
    |v| [v]
);
parity_test!(
    dx_14,
    Dx,
    DxConfig::new(nz(14)),
    |c| c,
    |v| [v.dx(), v.plus_di(), v.minus_di()]
);
parity_test!(adx_14, Adx, AdxConfig::new(nz(14)), |c| c, |v| [v]);
parity_test!(
    stoch_14_3_3,
    Stoch,
    StochConfig::new(nz(14), nz(3), nz(3)),
    |c| c,
    |v| [v.k(), v.d()]
);
parity_test!(ao_5_34, Ao, AoConfig::default_5_34(), |c| c, |v| [v]);
parity_test!(ac_5_34_5, Ac, AcConfig::default_5_34_5(), |c| c, |v| [v]);
parity_test!(
    abands_20,
    AccelerationBands,
    AccelerationBandsConfig::new(nz(20)),
    |c| c,
    |v| [v.upper(), v.middle(), v.lower()]
);
parity_test!(obv, Obv, ObvConfig, |c| c, |v| [v]);
parity_test!(psar, Psar, PsarConfig::default_2_20(), |c| c, |v| [v]);
parity_test!(rei_8, Rei, ReiConfig::default_8(), |c| c, |v| [v]);
parity_test!(vwap, Vwap, VwapConfig, |c| c, |v| [v]);
parity_test!(
    zigzag_5,
    ZigZag,
    ZigZagConfig::new(dec!(5)),
    |c| c,
    |v| [v]
);

#[test]
fn tds_completions_agree() {
    let mut fast: Tds<f64> = Tds::new(TdsConfig);
    let mut exact: Tds<Decimal> = Tds::new(TdsConfig);

    let fast_results = fast.updates(random_walk::<f64>().iter().map(|c| c.close), false);
    let exact_results = exact.updates(random_walk::<Decimal>().iter().map(|c| c.close), false);

    assert_eq!(fast_results, exact_results);
    assert!(fast_results.iter().any(Option::is_some));
}
