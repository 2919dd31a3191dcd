use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Pick an index with probability proportional to `weights`.
    fn weighted(&mut self, weights: &[f64]) -> usize {
        let total: f64 = weights.iter().sum();
        let mut target = self.next_f64() * total;
        for (i, w) in weights.iter().enumerate() {
            if target < *w {
                return i;
            }
            target -= w;
        }
        weights.len() - 1
    }
}

/// One multiple-choice question.
struct Question {
    column: &'static str,
    answers: &'static [&'static str],
    /// Chance that a respondent skipped the question.
    skip_rate: f64,
}

const FILIERES: &[&str] = &["Ingénierie", "Commerce", "Logistique", "Design", "Maintenance"];
const NIVEAUX: &[&str] = &["Bac", "BTS", "Licence", "Master"];

const QUESTIONS: &[Question] = &[
    Question {
        column: "Recherche d'emploi",
        answers: &["Oui, activement", "Oui, passivement", "Non"],
        skip_rate: 0.02,
    },
    Question {
        column: "Niveau de connaissance",
        answers: &["Aucune", "Faible", "Moyenne", "Bonne"],
        skip_rate: 0.03,
    },
    Question {
        column: "Perception des métiers",
        answers: &["Techniques", "Exigeants", "Valorisants", "Répétitifs", "Innovants"],
        skip_rate: 0.05,
    },
    Question {
        column: "Opportunités de carrière",
        answers: &["Nombreuses", "Limitées", "Je ne sais pas"],
        skip_rate: 0.05,
    },
    Question {
        column: "Raisons de ne pas postuler",
        answers: &["Image élitiste", "Manque d'information", "Localisation", "Diplôme requis"],
        skip_rate: 0.10,
    },
    Question {
        column: "Intérêt pour le luxe",
        answers: &["Fort", "Moyen", "Faible"],
        skip_rate: 0.03,
    },
    Question {
        column: "Motivations",
        answers: &["Salaire", "Savoir-faire", "International", "Sens du travail"],
        skip_rate: 0.04,
    },
    Question {
        column: "Canaux d'information",
        answers: &["Réseaux sociaux", "École", "Salons", "Bouche-à-oreille"],
        skip_rate: 0.04,
    },
    Question {
        column: "Initiatives motivantes",
        answers: &["Portes ouvertes", "Stages découverte", "Webinaires", "Mentorat"],
        skip_rate: 0.06,
    },
];

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);
    let n_respondents = 400;

    let mut filiere: Vec<Option<String>> = Vec::with_capacity(n_respondents);
    let mut niveau: Vec<Option<String>> = Vec::with_capacity(n_respondents);
    let mut answers: Vec<Vec<Option<String>>> =
        vec![Vec::with_capacity(n_respondents); QUESTIONS.len()];

    for _ in 0..n_respondents {
        let f = rng.weighted(&[3.0, 2.0, 2.0, 1.5, 1.5]);
        filiere.push(Some(FILIERES[f].to_string()));
        niveau.push(Some(NIVEAUX[rng.weighted(&[1.0, 2.0, 2.5, 3.0])].to_string()));

        for (q, question) in QUESTIONS.iter().enumerate() {
            if rng.next_f64() < question.skip_rate {
                answers[q].push(None);
                continue;
            }
            // Skew each answer distribution by field of study so the
            // cross-tabulations have something to show.
            let weights: Vec<f64> = (0..question.answers.len())
                .map(|a| 1.0 + ((a + f * (q + 1)) % question.answers.len()) as f64)
                .collect();
            let a = rng.weighted(&weights);
            answers[q].push(Some(question.answers[a].to_string()));
        }
    }

    let mut fields = vec![
        Field::new("Filière", DataType::Utf8, true),
        Field::new("Niveau d'études", DataType::Utf8, true),
    ];
    let mut columns: Vec<ArrayRef> = vec![
        Arc::new(StringArray::from(filiere)),
        Arc::new(StringArray::from(niveau)),
    ];
    for (question, values) in QUESTIONS.iter().zip(answers) {
        fields.push(Field::new(question.column, DataType::Utf8, true));
        columns.push(Arc::new(StringArray::from(values)));
    }

    let schema = Arc::new(Schema::new(fields));
    let batch =
        RecordBatch::try_new(schema.clone(), columns).context("building record batch")?;

    // Write Parquet
    let parquet_path = "Data_challenge.parquet";
    let file = std::fs::File::create(parquet_path).context("creating parquet output")?;
    let mut writer =
        ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing parquet batch")?;
    writer.close().context("closing parquet writer")?;

    // Write CSV (the default data file of the dashboard)
    let csv_path = "Data_challenge.csv";
    let file = std::fs::File::create(csv_path).context("creating CSV output")?;
    let mut csv_writer = arrow::csv::Writer::new(file);
    csv_writer.write(&batch).context("writing CSV")?;

    println!(
        "Wrote {n_respondents} responses ({} questions each) to {parquet_path} and {csv_path}",
        batch.num_columns()
    );
    Ok(())
}
