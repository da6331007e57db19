// Entry point for the namechain CLI
use clap::Parser;
use data_encoding::HEXLOWER;
use log::error;
use namechain::core::format_satoshis;
use namechain::names::decode_name_script;
use namechain::{
    address_to_pub_key_hash, construct_name_registration, get_name_cost, validate_address,
    Blockchain, Command, Name, NameData, Opt, Script, GLOBAL_CONFIG,
};
use serde_json::json;
use std::process;

fn main() {
    let opt = Opt::parse();

    // the config file may change the log level, so it is read before the logger starts
    let config_result = match &opt.config {
        Some(path) => GLOBAL_CONFIG.load_from_file(path),
        None => Ok(()),
    };
    env_logger::builder()
        .filter_level(GLOBAL_CONFIG.get_log_level())
        .init();
    if let Err(e) = config_result {
        error!("Error: {e}");
        process::exit(1);
    }

    if let Err(e) = run_command(opt.command) {
        error!("Error: {e}");
        process::exit(1);
    }
}

fn run_command(command: Command) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Command::Createchain { address } => {
            if !validate_address(&address) {
                return Err(format!("Invalid address: {address}").into());
            }
            let blockchain = Blockchain::create_blockchain(&address)?;
            println!("Done! Tip: {}", blockchain.get_tip_hash()?);
        }
        Command::GetName { name } => {
            let blockchain = Blockchain::new_blockchain()?;
            let name = Name::from_string(&name);
            let data = blockchain
                .get_name(&name)?
                .ok_or_else(|| format!("Name not found: {name}"))?;
            let address = blockchain.get_name_address(&name)?;
            let out = json!({
                "name": name.to_lossy_string(),
                "address": address,
                "script": data.get_address().to_string(),
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        Command::ListNames => {
            let blockchain = Blockchain::new_blockchain()?;
            for (name, data) in blockchain.list_names()? {
                let address = data
                    .destination_address()
                    .unwrap_or_else(|| data.get_address().to_string());
                println!("{name} -> {address}");
            }
        }
        Command::NameCost { name } => {
            let cost = get_name_cost(&Name::from_string(&name));
            println!("Registering {name:?} costs {} ({cost} satoshis)", format_satoshis(cost));
        }
        Command::EncodeName { name, address } => {
            let pub_key_hash = address_to_pub_key_hash(&address)?;
            let data = NameData::new(Script::new_p2pkh(&pub_key_hash));
            let script = construct_name_registration(&Name::from_string(&name), &data)?;
            println!("{script}");
        }
        Command::DecodeScript { script } => {
            let bytes = HEXLOWER
                .decode(script.to_ascii_lowercase().as_bytes())
                .map_err(|e| format!("Invalid hex: {e}"))?;
            let out = match decode_name_script(&Script::from_bytes(bytes))? {
                Some(op) => {
                    let data = op.name_data();
                    json!({
                        "op": format!("{:?}", op.kind()),
                        "name": op.name().to_lossy_string(),
                        "name_hex": hex::encode(op.name().as_bytes()),
                        "address": data.destination_address(),
                        "script": data.get_address().to_string(),
                        "cost": get_name_cost(op.name()),
                    })
                }
                None => json!(null),
            };
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        Command::Printchain => {
            let blockchain = Blockchain::new_blockchain()?;
            for block in blockchain.iterator()? {
                println!("Pre block hash: {}", block.get_pre_block_hash());
                println!("Cur block hash: {}", block.get_hash());
                println!("Cur block height: {}", block.get_height());
                println!("Cur block Timestamp: {}", block.get_timestamp());

                for tx in block.get_transactions() {
                    println!("- Transaction txid_hex: {}", tx.get_id_hex());
                    if !tx.is_coinbase() {
                        for input in tx.get_vin() {
                            println!(
                                "-- Input txid = {}, vout = {}",
                                HEXLOWER.encode(input.get_txid()),
                                input.get_vout(),
                            )
                        }
                    }
                    for output in tx.get_vout() {
                        let script = output.get_script_pubkey();
                        match decode_name_script(script) {
                            Ok(Some(op)) => println!(
                                "-- Output value = {}, registers {} -> {}",
                                output.get_value(),
                                op.name(),
                                op.name_data()
                                    .destination_address()
                                    .unwrap_or_else(|| op.name_data().get_address().to_string()),
                            ),
                            Ok(None) => println!(
                                "-- Output value = {}, script = {}",
                                output.get_value(),
                                script
                            ),
                            Err(e) => println!(
                                "-- Output value = {}, malformed name script: {e}",
                                output.get_value()
                            ),
                        }
                    }
                }
                println!()
            }
        }
    }
    Ok(())
}
