use approx::assert_relative_eq;
use simplex::{phase_one, phase_two, simplex, Context, Feasibility, LPResult, StandardForm, Tableau};

fn main() {
    // maximize   x0 - x1 + x2
    // subject to 2 x0 -   x1 + 2 x2 <= 4
    //            2 x0 - 3 x1 +   x2 <= -5
    //             -x0 +   x1 - 2 x2 <= -1
    let c = vec![1.0, -1.0, 1.0];
    let b = vec![4.0, -5.0, -1.0];
    let a = vec![
        vec![2.0, -1.0, 2.0],
        vec![2.0, -3.0, 1.0],
        vec![-1.0, 1.0, -2.0],
    ];

    let standard = StandardForm::new(c, a, b).expect("dimensions agree");
    let solution = simplex(&standard).expect("well formed problem");
    match solution {
        LPResult::Feasible((sol, optimal)) => {
            assert_relative_eq!(optimal, 0.6, epsilon = 1e-8);
            println!("solution: {:?}", sol);
            println!("optimal: {}", optimal);
        }
        LPResult::Infeasible => {
            println!("Infeasible");
        }
        LPResult::Unbounded => {
            println!("Unbounded");
        }
    };

    // The same machinery on a tableau given directly, slack columns included.
    let mut tableau: Tableau = "4 7
        0 -10 -12 -12 0 0 0
        20 1 2 2 1 0 0
        20 2 1 2 0 1 0
        20 2 2 1 0 0 1"
        .parse()
        .expect("valid tableau");
    let mut context = Context::tracing();
    if phase_one(&mut tableau, &mut context).expect("full rank") == Feasibility::Feasible {
        let value = phase_two(&mut tableau, &mut context).expect("full rank");
        for (phase, step) in context.trace() {
            println!("[{}] {}", phase, step);
        }
        print!("{}", tableau);
        println!("maximum: {}", -value);
    }
}
