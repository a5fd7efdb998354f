use super::super::args::ShowHintsArgs;
use crate::exit_codes;
use hintprobe_core::hints::{complex_hint, decode_complex_hint, simple_hint};
use hintprobe_core::model::ChoiceLabel;
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Print example hints for every (correct, hinted) letter pair, with the
/// mod-4 verification for the complex format.
pub(crate) fn show(args: ShowHintsArgs) -> anyhow::Result<i32> {
    let mut rng = StdRng::seed_from_u64(args.seed);

    println!("Example hints per (correct, hinted) letter pair");
    println!("{}", "=".repeat(60));

    for correct in ChoiceLabel::ALL {
        println!("\nCorrect answer: {correct}");
        for hinted in ChoiceLabel::ALL {
            let tag = if hinted == correct {
                "hint correct"
            } else {
                "hint incorrect"
            };
            let simple = simple_hint(hinted);
            let complex = complex_hint(hinted, &mut rng);
            let decoded = decode_complex_hint(&complex);
            let check = if decoded == Some(hinted) { "ok" } else { "MISMATCH" };

            println!("  hinted {hinted} ({tag}):");
            println!("    simple:  {simple}");
            println!("    complex: {complex}");
            println!("    decode:  {} [{check}]", decoded.map_or("?".into(), |l| l.to_string()));
        }
    }

    Ok(exit_codes::SUCCESS)
}
