// Sanity-check driver for the softmax loss.
//
// Builds a random problem, evaluates it with both realizations, spot-checks
// the analytic gradient against centered differences and prints a JSON
// report. Run with:
//   cargo run -- [N D C [REG]]
// and RUST_LOG=debug to see every sampled gradient coordinate.
use std::env;
use std::error::Error;

use log::info;
use rand::Rng;
use serde::Serialize;

use softmax_loss::{grad_check_sparse, GradCheck, Matrix, Realization, SoftmaxLoss};

const DEFAULT_DIMS: (usize, usize, usize) = (64, 32, 10);
const WEIGHT_SCALE: f64 = 1e-4;
const NUM_CHECKS: usize = 10;
const STEP: f64 = 1e-5;

#[derive(Serialize)]
struct Report {
    num_train: usize,
    num_features: usize,
    num_classes: usize,
    reg: f64,
    naive_loss: f64,
    vectorized_loss: f64,
    /// -ln(1/C): what the loss should be close to with near-zero weights.
    expected_initial_loss: f64,
    loss_difference: f64,
    max_grad_difference: f64,
    grad_check: Vec<GradCheck>,
    max_rel_error: f64,
}

fn parse_arg<T: std::str::FromStr>(args: &[String], idx: usize, name: &str, default: T) -> Result<T, Box<dyn Error>> {
    match args.get(idx) {
        None => Ok(default),
        Some(raw) => raw
            .parse()
            .map_err(|_| format!("invalid value for {name}: '{raw}'").into()),
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let args: Vec<String> = env::args().skip(1).collect();
    let (d_n, d_d, d_c) = DEFAULT_DIMS;
    let num_train = parse_arg(&args, 0, "N", d_n)?;
    let num_features = parse_arg(&args, 1, "D", d_d)?;
    let num_classes = parse_arg(&args, 2, "C", d_c)?;
    let reg = parse_arg(&args, 3, "REG", 0.0)?;
    if num_classes == 0 {
        return Err("C must be at least 1".into());
    }

    let mut rng = rand::thread_rng();
    let w = Matrix::randn(num_features, num_classes, WEIGHT_SCALE, &mut rng);
    let x = Matrix::random(num_train, num_features);
    let y: Vec<usize> = (0..num_train).map(|_| rng.gen_range(0..num_classes)).collect();

    info!("evaluating N={num_train} D={num_features} C={num_classes} reg={reg}");

    let naive = SoftmaxLoss::new(reg).with_realization(Realization::Naive);
    let vectorized = SoftmaxLoss::new(reg).with_realization(Realization::Vectorized);

    let naive_out = naive.evaluate(&w, &x, &y)?;
    let vectorized_out = vectorized.evaluate(&w, &x, &y)?;

    let grad_check = if num_features > 0 {
        grad_check_sparse(
            |probe| vectorized.evaluate(probe, &x, &y).map(|out| out.loss),
            &w,
            &vectorized_out.grad,
            NUM_CHECKS,
            STEP,
            &mut rng,
        )?
    } else {
        Vec::new()
    };

    let report = Report {
        num_train,
        num_features,
        num_classes,
        reg,
        naive_loss: naive_out.loss,
        vectorized_loss: vectorized_out.loss,
        expected_initial_loss: (num_classes as f64).ln(),
        loss_difference: (naive_out.loss - vectorized_out.loss).abs(),
        max_grad_difference: naive_out.grad.max_abs_diff(&vectorized_out.grad),
        max_rel_error: GradCheck::max_rel_error(&grad_check),
        grad_check,
    };

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
