use anyhow::Context;
use clap::Parser;
use crystalline::core::identity::CrystallineIdentity;
use crystalline::utils::error::CrystallineError;
use crystalline::utils::{logger, validation::Validate};
use crystalline::{
    ActionStatus, AuditArgs, AuditEngine, BatchAuditPipeline, CliConfig, Command, Kernel,
    LocalStorage, SealedPacket, TomlConfig,
};

fn load_kernel(policy: Option<TomlConfig>) -> anyhow::Result<Kernel> {
    let Some(policy) = policy else {
        tracing::debug!("No policy file given, using the default policy");
        return Ok(Kernel::default_policy());
    };

    policy.validate()?;
    Ok(Kernel::from_config(&policy)?)
}

async fn run_audit(kernel: Kernel, mut args: AuditArgs) -> anyhow::Result<()> {
    args.validate()?;
    // Storage is rooted at the output directory; an absolute input path escapes it.
    args.input = std::fs::canonicalize(&args.input)
        .with_context(|| format!("Audit input '{}' not found", args.input))?
        .to_string_lossy()
        .into_owned();

    let storage = LocalStorage::new(args.output.clone());
    let engine = AuditEngine::new(BatchAuditPipeline::new(storage, args, kernel));
    let output_path = engine.run().await?;

    println!("✅ Audit completed");
    println!("📁 Report saved to: {}", output_path);
    Ok(())
}

async fn run(config: CliConfig, policy: Option<TomlConfig>) -> anyhow::Result<()> {
    let kernel = load_kernel(policy)?;

    match config.command {
        Command::Check { payload } => match kernel.check_compliance(&payload) {
            ActionStatus::Allowed => println!("ALLOWED"),
            ActionStatus::Forbidden => {
                println!("FORBIDDEN");
                return Err(CrystallineError::DeonticConflict {
                    message: "payload is not compliant".to_string(),
                }
                .into());
            }
        },
        Command::Partition { label } => {
            if kernel.verify_partition(&label) {
                println!("VALID");
            } else {
                println!("INVALID");
                let reason = format!("'{}' is not a valid partition", label);
                return Err(CrystallineError::validation("label", reason).into());
            }
        }
        Command::Seal { message, recipient } => {
            let packet = kernel.seal_as_set(&message, &recipient)?;
            println!("{}", packet.to_base64());
        }
        Command::Open { packet, recipient } => {
            let packet = SealedPacket::from_base64(&packet)?;
            println!("{}", kernel.open_set(&packet, &recipient)?);
        }
        Command::Keygen { mode } => {
            let identity = CrystallineIdentity::generate(mode);
            println!("mode:        {}", identity.mode());
            println!("public:      {}", identity.public_key_hex());
            println!("secret:      {}", identity.private_key_hex());
            println!("fingerprint: {}", identity.fingerprint());
        }
        Command::Audit(args) => run_audit(kernel, args).await?,
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    let config = CliConfig::parse();

    let policy = match config.config.as_deref().map(TomlConfig::from_file).transpose() {
        Ok(policy) => policy,
        Err(e) => {
            eprintln!("❌ Failed to load policy file: {}", e);
            eprintln!("💡 Suggestion: {}", e.recovery_suggestion());
            std::process::exit(1);
        }
    };

    logger::init_cli_logger(config.verbose, policy.as_ref().and_then(TomlConfig::log_level));
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    if let Err(e) = run(config, policy).await {
        let Some(err) = e.downcast_ref::<CrystallineError>() else {
            tracing::error!("❌ {:#}", e);
            eprintln!("❌ {:#}", e);
            std::process::exit(1);
        };

        tracing::error!(
            "❌ Failed: {} (Category: {:?}, Severity: {:?})",
            err,
            err.category(),
            err.severity()
        );
        eprintln!("❌ {}", err.user_friendly_message());
        eprintln!("💡 Suggestion: {}", err.recovery_suggestion());
        std::process::exit(err.severity().exit_code());
    }
}
