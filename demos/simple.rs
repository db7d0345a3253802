use metar_core::parse;

fn main() {
    let raw = "METAR CYTZ 051900Z AUTO 17011G20KT 15SM FEW040 22/12 A2992";

    match parse(raw) {
        Ok(decoded) => {
            println!("Raw report:\n{}\n", decoded.raw);
            match decoded.report_json() {
                Ok(json) => println!("Decoded:\n{json}"),
                Err(e) => eprintln!("Failed to serialize report: {e}"),
            }
            for warning in &decoded.warnings {
                eprintln!("{:?}", miette::Report::new(warning.clone()));
            }
        }
        Err(e) => {
            eprintln!("Failed to decode METAR: {:?}", miette::Report::new(e));
        }
    }
}
