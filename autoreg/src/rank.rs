//! Deciding how many singular directions of a problem carry signal.
//!
//! The input is the Picard vector `g[i] = |(Uᵀb)[i] / S[i]|`. While the Picard
//! condition holds it stays roughly flat; once noise starts getting amplified by
//! small singular values it rises, either abruptly ([`split_a`]) or gradually
//! ([`split_b`]). The usable rank is the tighter of the two cut-offs.

/// How far the explosion detector lets a value exceed the smoothed minimum.
const EXPLOSION_FACTOR: f64 = 25.0;

/// Width of the moving window used by both detectors, given the vector length.
pub fn decide_width(nr: usize) -> usize {
    match nr {
        0..3 => 1,
        3..=8 => 2,
        9..=12 => 3,
        13..=20 => 4,
        21..=28 => 5,
        29..=36 => 6,
        37..=50 => 7,
        51..=64 => 8,
        65..=80 => 9,
        81..=200 => 10,
        201..=300 => 12,
        301..=400 => 14,
        401..=1000 => 16,
        _ => 20,
    }
}

/// How much larger than the quietest window a window must be to count as bad.
pub fn decide_multiple(width: usize) -> f64 {
    match width {
        0..3 => 30.0,
        3..=10 => 20.0,
        11..=20 => 15.0,
        _ => 7.0,
    }
}

/// Sums of every run of `width` consecutive values.
/// There are `values.len() - width + 1` of them (none if the window doesn't fit).
pub fn moving_sums(values: &[f64], width: usize) -> Vec<f64> {
    if width == 0 {
        return Vec::new();
    }
    values.windows(width).map(|w| w.iter().sum()).collect()
}

/// Explosion detector: finds an abrupt multiplicative jump over the noise floor.
pub fn split_a(g: &[f64]) -> usize {
    let nr = g.len();
    if nr < 2 {
        return nr;
    }
    let width = decide_width(nr);
    // Slow tracker, biased to follow minima closely.
    let mut small = g[0];
    // Faster symmetric tracker.
    let mut local = g[0];
    let mut usable = 1;
    for (i, &sensitivity) in g.iter().enumerate().skip(1) {
        if i >= width && sensitivity > EXPLOSION_FACTOR * small && sensitivity > local {
            break;
        }
        let decay = if sensitivity < small { 0.40 } else { 0.10 };
        small += decay * (sensitivity - small);
        local += 0.40 * (sensitivity - local);
        usable = i + 1;
    }
    usable
}

/// Gradual-rise detector: finds where the windowed energy of `g` climbs well
/// above its quietest stretch.
pub fn split_b(g: &[f64]) -> usize {
    let nr = g.len();
    let width = decide_width(nr);
    if width < 2 {
        return nr;
    }
    let mut squared: Vec<f64> = g.iter().map(|x| x * x).collect();
    // Single-sample dropouts would otherwise make a window look quieter than it is.
    for i in 1..nr - 1 {
        let neighbours = libm::fmin(squared[i - 1], squared[i + 1]);
        if squared[i] < 0.2 * neighbours {
            squared[i] = 0.5 * neighbours;
        }
    }
    let sums = moving_sums(&squared, width);
    let Some(ilow) = first_min_index(&sums) else {
        return nr;
    };
    let bad = decide_multiple(width) * sums[ilow];
    match sums.iter().skip(ilow + 1).position(|&s| s > bad) {
        Some(offset) => ilow + 1 + offset + width - 1,
        None => nr,
    }
}

/// The number of leading entries of the Picard vector judged to carry signal.
/// Never more than `g.len()`.
pub fn usable_rank(g: &[f64]) -> usize {
    let a = split_a(g);
    let b = split_b(g);
    log::trace!("usable rank: explosion detector {a}, gradual-rise detector {b}");
    a.min(b)
}

/// `g[i] = |utb[i] / s[i]|` for the first `nr` singular values.
pub fn picard_vector(utb: &[f64], s: &[f64], nr: usize) -> Vec<f64> {
    utb.iter()
        .zip(s)
        .take(nr)
        .map(|(beta, sigma)| (beta / sigma).abs())
        .collect()
}

fn first_min_index(values: &[f64]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, &v) in values.iter().enumerate() {
        match best {
            Some((_, current)) if v >= current => {}
            _ => best = Some((i, v)),
        }
    }
    best.map(|(i, _)| i)
}
