// Thu Oct 15 2026 - Alex

use super::args::{Args, Command, DumpArgs, LayoutArgs, PeekArgs};
use crate::config::Config;
use crate::memory::{Address, BackingStore, MappedMemory, MemoryReader, ProcessMemory};
use crate::registry::{TypeRegistry, ViewFactory};
use crate::schema;
use crate::structure::RecordId;
use crate::types::TypeDesc;
use crate::ui::table::{Alignment, TableBuilder};
use crate::utils::LoggingUtils;
use crate::view::Obj;
use anyhow::{anyhow, Context};
use colored::Colorize;
use std::path::Path;
use std::sync::Arc;

pub struct CommandHandler {
    use_color: bool,
}

impl CommandHandler {
    pub fn new() -> Self {
        Self { use_color: true }
    }

    pub fn execute(mut self, args: Args) -> anyhow::Result<()> {
        let config = match &args.config {
            Some(path) => Config::load(path).with_context(|| format!("loading {}", path.display()))?,
            None => Config::default(),
        };

        if args.no_color {
            self.use_color = false;
            colored::control::set_override(false);
        }
        self.setup_logging(&args, &config);

        let registry = TypeRegistry::with_config(config);
        match args.command {
            Command::Layout(layout_args) => self.handle_layout(&registry, layout_args),
            Command::Dump(dump_args) => self.handle_dump(&registry, dump_args),
            Command::Peek(peek_args) => self.handle_peek(&registry, peek_args),
        }
    }

    fn setup_logging(&self, args: &Args, config: &Config) {
        let level = args.log_level.as_deref().unwrap_or(&config.log_level);
        LoggingUtils::init(LoggingUtils::level_from_str(level), self.use_color);
    }

    fn load_record(&self, registry: &TypeRegistry, schema_path: &Path, name: &str) -> anyhow::Result<RecordId> {
        schema::load_file(registry, schema_path)
            .with_context(|| format!("loading schema {}", schema_path.display()))?;
        registry
            .record_by_name(name)
            .ok_or_else(|| anyhow!("schema {} has no record named {}", schema_path.display(), name))
    }

    fn handle_layout(&self, registry: &Arc<TypeRegistry>, args: LayoutArgs) -> anyhow::Result<()> {
        let id = self.load_record(registry, &args.schema, &args.record)?;
        let layout = registry.record_layout(id)?;

        println!("{} ({} bytes)", layout.name().cyan().bold(), layout.size());
        let mut table = TableBuilder::new()
            .with_headers(&["offset", "size", "type", "name", "declared in"])
            .with_alignment(0, Alignment::Right)
            .with_alignment(1, Alignment::Right)
            .with_color(self.use_color);
        for member in layout.members() {
            table = table.add_row(&[
                format!("0x{:x}", member.offset),
                member.size.to_string(),
                member.inflater.name(),
                member.name.clone(),
                member.declared_in.clone(),
            ]);
        }
        println!("{}", table.build());

        for (offset, len) in layout.gaps() {
            println!("{} {} bytes skipped at 0x{:x}", "[gap]".yellow(), len, offset);
        }
        Ok(())
    }

    fn handle_dump(&self, registry: &Arc<TypeRegistry>, args: DumpArgs) -> anyhow::Result<()> {
        let id = self.load_record(registry, &args.schema, &args.record)?;
        let base = parse_address(&args.base)?;
        let address = match &args.address {
            Some(text) => parse_address(text)?,
            None => base,
        };
        let memory = MappedMemory::open(&args.file, base)
            .with_context(|| format!("mapping {}", args.file.display()))?;
        log::info!("mapped {} bytes of {} at {}", memory.len(), args.file.display(), base);
        self.print_record(registry, Arc::new(memory), id, address, args.json)
    }

    fn handle_peek(&self, registry: &Arc<TypeRegistry>, args: PeekArgs) -> anyhow::Result<()> {
        let id = self.load_record(registry, &args.schema, &args.record)?;
        let address = parse_address(&args.address)?;
        let process = ProcessMemory::attach(args.pid).with_context(|| format!("attaching to {}", args.pid))?;
        self.print_record(registry, Arc::new(process), id, address, args.json)
    }

    fn print_record(
        &self,
        registry: &Arc<TypeRegistry>,
        store: Arc<dyn BackingStore>,
        id: RecordId,
        address: Address,
        json: bool,
    ) -> anyhow::Result<()> {
        log::info!("reading {} at {} from {}", id, address, store.name());
        let factory = ViewFactory::with_registry(store, Arc::clone(registry));
        let view = factory.inflate(&TypeDesc::Record(id), address)?;
        if json {
            println!("{}", serde_json::to_string_pretty(&view.get()?)?);
        } else {
            println!("{} {}", address.to_string().dimmed(), view.to_str(0)?);
        }
        Ok(())
    }
}

impl Default for CommandHandler {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_address(text: &str) -> anyhow::Result<Address> {
    Address::parse(text).ok_or_else(|| anyhow!("invalid address {}", text))
}
