use data_loader::MovieCatalog;
use std::path::Path;
use std::time::Instant;

fn main() -> anyhow::Result<()> {
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "data/movies.json".to_string());

    println!("Loading movie catalog from {}...\n", path);

    let start = Instant::now();
    let catalog = MovieCatalog::load_from_file(Path::new(&path))?;
    let elapsed = start.elapsed();

    println!("=== Load Complete ===");
    println!("Time taken: {:?}", elapsed);
    println!("Movies: {}", catalog.len());
    println!("\nPerformance: {:.0} movies/second",
             catalog.len() as f64 / elapsed.as_secs_f64());

    let start = Instant::now();
    let hits = catalog.search("the", 20);
    println!("Search 'the': {} hits in {:?}", hits.len(), start.elapsed());
    Ok(())
}
