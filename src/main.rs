//! Runs the worked physics examples.

use mensura::{unit, Quantity, RenderMode};

fn print_both(label: &str, q: &Quantity) {
    println!("{label} = {q}");
    println!("{label} = {}", q.render(RenderMode::Unicode));
}

fn main() {
    // P = m(a + g): the force on a 70 kg mass accelerating at 1 m/s² under gravity.
    let m = Quantity::new(7.0, 1, unit!(kg: 1));
    let a = Quantity::new(1.0, 0, unit!(m: 1, s: -2));
    let g = Quantity::new(9.8, 0, unit!(m: 1, s: -2));
    let p = m * (a + g);
    print_both("P", &p);
    print_both("P", &p.ungroup());

    // h = m²v²/(2gM²): ballistic pendulum, 648 km/h projectile.
    let to_mpersec = |v: Quantity| Quantity::new(v.raw_value() / 3.6, 0, unit!(m: 1, s: -1));
    let big_m = Quantity::new(2.8, 0, unit!(kg: 1));
    let m = Quantity::new(10.0, -3, unit!(kg: 1));
    let v = to_mpersec(Quantity::new(6.48, 2, unit!(km: 1, h: -1)));
    let g = Quantity::new(9.8, 0, unit!(m: 1, s: -2));
    let h = m.powf(2.0) * v.powf(2.0) / (2.0 * g * big_m.powf(2.0));
    print_both("h", &h.round_to(3));

    // v = sqrt(2Mgh/(M + m)) in km/h.
    let big_m = Quantity::new(1.0, 0, unit!(kg: 1));
    let m = Quantity::new(500.0, -3, unit!(kg: 1));
    let height = Quantity::new(0.5, 0, unit!(m: 1));
    let g = Quantity::new(9.8, 0, unit!(m: 1, s: -2));
    let v = (2.0 * big_m.clone() * g * height / (big_m + m)).powf(0.5);
    let v = Quantity::new((v * 3.6).raw_value(), 0, unit!(km: 1, h: -1));
    print_both("v", &v.round_to(1));

    // F = ma.
    let m = Quantity::new(5.0, 0, unit!(kg: 1));
    let a = Quantity::new(2.5, 1, unit!(m: 1, s: -2));
    print_both("F", &(m * a));
}
