use rand::distributions::OpenClosed01;
use rand::Rng;

/// Draw of a geometric distributed random variable, `floor(ln(u) / ln(1 - rate))` with
/// `u` uniform on `(0, 1]`. `rate` has to lie in `(0, 1)`.
pub fn geometric<R: Rng + ?Sized>(rng: &mut R, rate: f64) -> u64 {
    let u: f64 = rng.sample(OpenClosed01);
    let draw = (u.ln() / (1.0 - rate).ln()).floor();

    // u == 1 yields -0.0
    draw.max(0.0) as u64
}

/// Upper bound for a single draw, `limit - randomInt(0, limit / 2)`.
pub fn draw_cap<R: Rng + ?Sized>(rng: &mut R, limit: u64) -> u64 {
    let half = limit / 2;
    if half == 0 {
        return limit;
    }

    limit - rng.gen_range(0..half)
}
