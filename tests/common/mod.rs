use std::fs;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::PathBuf;
use std::str::FromStr;

use data_encoding::HEXLOWER;

pub fn setup() {
    let results_dir_path = PathBuf::from_str("./target/results/").unwrap();

    if !results_dir_path.exists() {
        fs::create_dir_all(&results_dir_path).unwrap_or_else(|_|
            panic!("Failed to create results directory: {:?}", results_dir_path)
        );
    } else {
        println!("Results directory exists at {:?}", results_dir_path);
    }
}

#[allow(dead_code)]
pub fn read_lines(path: &PathBuf) -> Result<Vec<String>, anyhow::Error> {
    let reader = BufReader::new(File::open(path)?);
    let lines = reader.lines().map(|x| x.unwrap()).collect();
    Ok(lines)
}

#[allow(dead_code)]
pub fn temp_file_name(dir: &str, extension: &str) -> PathBuf {
    let mut result = PathBuf::from(dir);
    let name = HEXLOWER.encode(&rand::random::<[u8; 16]>());
    result.push(format!("{}.{}", name, extension));
    result
}

/// Copy a fixture to a fresh file under ./target/results/ so it can be sorted in place
#[allow(dead_code)]
pub fn copy_fixture(name: &str) -> Result<PathBuf, anyhow::Error> {
    let source = PathBuf::from("./tests/fixtures").join(name);
    let extension = source.extension()
        .map(|extension| extension.to_string_lossy().to_string())
        .unwrap_or_default();
    let target = temp_file_name("./target/results/", &extension);
    fs::copy(&source, &target)?;
    Ok(target)
}

/// Write `content` to a fresh file under ./target/results/
#[allow(dead_code)]
pub fn write_file(content: &str, extension: &str) -> Result<PathBuf, anyhow::Error> {
    let target = temp_file_name("./target/results/", extension);
    fs::write(&target, content)?;
    Ok(target)
}

/// Random rows of `id,name,score,joined,active` with repeated names and scores, some
/// empty fields and comma decimal scores
#[allow(dead_code)]
pub fn random_table(rows: usize) -> String {
    let names = ["Ann", "ann", "Bob", "Émile", "emile", "Zoë", "zoe", "Carl", ""];
    let mut content = String::from("id,name,score,joined,active\n");
    for id in 0..rows {
        let name = names[rand::random::<usize>() % names.len()];
        let score = match rand::random::<u8>() % 5 {
            0 => String::new(),
            1 => format!("\"{},{}\"", rand::random::<u8>() % 20, rand::random::<u8>() % 10),
            _ => format!("{}.{}", rand::random::<u8>() % 20, rand::random::<u8>() % 10),
        };
        let joined = format!("20{:02}-{:02}-{:02}", rand::random::<u8>() % 24, 1 + rand::random::<u8>() % 12, 1 + rand::random::<u8>() % 28);
        let active = if rand::random::<bool>() { "yes" } else { "no" };
        content.push_str(&format!("{},{},{},{},{}\n", id, name, score, joined, active));
    }
    content
}
