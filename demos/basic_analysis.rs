//! Basic example: score a small GWAS result and filter it.
//!
//! This example shows how to:
//! 1. Build the three inputs in memory
//! 2. Compute sensitivity/specificity per variant
//! 3. Filter on thresholds and p-value
//! 4. Examine both subsets

use sensi_speci::prelude::*;

fn main() -> Result<()> {
    println!("=== Sensitivity/Specificity Example ===\n");

    let (gwas, phenotypes, matrix) = create_example_data()?;

    println!("Data dimensions:");
    println!("  Variants:   {}", gwas.n_rows());
    println!("  Samples:    {}", phenotypes.n_samples());
    println!("  Rtab rows:  {}", matrix.n_variants());
    println!();

    let (scored, stats) = compute_stats_with_report(&gwas, &phenotypes, &matrix, "resistant")?;
    print!("{}", stats);
    println!();

    for row in scored.rows() {
        println!("  {}", row.join("\t"));
    }
    println!();

    let mut config = FilterConfig::default();
    config.thresholds.sensi_presence = 0.5;
    config.thresholds.speci_presence = 0.8;
    config.thresholds.sensi_absence = 0.5;
    config.thresholds.speci_absence = 0.7;
    config.p_value.threshold = 0.05;

    let (filtered, report) = filter_variants_with_report(&scored, &config)?;
    print!("{}", report);
    println!();

    println!("Presence-associated: {:?}", filtered.presence.variant_ids()?);
    println!("Absence-associated:  {:?}", filtered.absence.variant_ids()?);

    Ok(())
}

/// Eight genomes, four resistant. `blaX` tracks resistance, `porY` is lost in
/// resistant genomes, `core1` is everywhere.
fn create_example_data() -> Result<(VariantTable, PhenotypeTable, PresenceAbsenceMatrix)> {
    let gwas = VariantTable::from_reader(
        "variant\taf\tlrt-pvalue\tbeta\n\
         blaX\t0.5\t0.0001\t3.1\n\
         porY\t0.5\t0.0004\t-2.7\n\
         core1\t1.0\t0.6\t0.0\n"
            .as_bytes(),
    )?;

    let phenotypes = PhenotypeTable::from_reader(
        "sample\tresistant\n\
         g1\t1\ng2\t1\ng3\t1\ng4\t1\n\
         g5\t0\ng6\t0\ng7\t0\ng8\t0\n"
            .as_bytes(),
    )?;

    let matrix = PresenceAbsenceMatrix::from_reader(
        "Gene\tg1\tg2\tg3\tg4\tg5\tg6\tg7\tg8\n\
         blaX\t1\t1\t1\t0\t0\t0\t0\t0\n\
         porY\t0\t0\t0\t0\t1\t1\t1\t0\n\
         core1\t1\t1\t1\t1\t1\t1\t1\t1\n"
            .as_bytes(),
    )?;

    Ok((gwas, phenotypes, matrix))
}
