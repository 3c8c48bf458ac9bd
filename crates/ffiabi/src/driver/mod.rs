//! Classification driver and pipeline orchestration

use std::fmt::Write as _;

use crate::common::{AbiResult, DiagnosticReporter};
use crate::factory::from_source_type;
use crate::frontend::{parse_annotation, CompileContext, FrontendConfig, NameTable, SourceType};
use crate::target::{ArgumentLowering, Arch, LoweringPlan, TargetConfig};
use crate::types::{NativeTypeZone, TypeId};

/// One classified annotation
#[derive(Debug, Clone)]
pub struct Classified {
    pub source: SourceType,
    pub native: TypeId,
    /// Present when the annotation is a function signature
    pub lowering: Option<LoweringPlan>,
}

/// Pipeline from annotation text to native types for one target
///
/// Owns the zone, so every classified annotation stays valid for the
/// lifetime of the pipeline and signatures share primitive handles.
pub struct Pipeline {
    target: TargetConfig,
    frontend: FrontendConfig,
    reporter: DiagnosticReporter,
    names: NameTable,
    zone: NativeTypeZone,
}

impl Pipeline {
    pub fn new(target: TargetConfig, frontend: FrontendConfig) -> Self {
        Self {
            target,
            frontend,
            reporter: DiagnosticReporter::new(),
            names: NameTable::new(),
            zone: NativeTypeZone::new(),
        }
    }

    pub fn arch(&self) -> Arch {
        self.target.arch
    }

    pub fn zone(&self) -> &NativeTypeZone {
        &self.zone
    }

    pub fn names(&self) -> &NameTable {
        &self.names
    }

    pub fn reporter(&self) -> &DiagnosticReporter {
        &self.reporter
    }

    /// Parse `source`, map it to a native type and lower it if it is a
    /// signature. Errors are rendered to stderr against `filename` before
    /// being returned.
    pub fn classify(&mut self, filename: &str, source: &str) -> AbiResult<Classified> {
        let file_id = self.reporter.add_file(filename, source);
        let arch = self.target.arch;

        let ctx = CompileContext::new(filename.to_string(), file_id, &self.reporter);
        let parsed = parse_annotation(source, &mut self.names, &ctx, &self.frontend)?;

        if self.frontend.verbose {
            eprintln!("Classifying {} for {}...", parsed.display(&self.names), arch);
        }

        let native = match from_source_type(&mut self.zone, arch, &parsed) {
            Ok(id) => id,
            Err(e) => {
                self.reporter.report_error(file_id, &e);
                return Err(e);
            }
        };

        let lowering = self
            .zone
            .as_function(native)
            .is_some()
            .then(|| arch.lower_signature(&self.zone, native));

        if self.frontend.verbose {
            eprintln!("Native type: {} (zone holds {} types)", self.zone.display(native), self.zone.len());
        }

        Ok(Classified {
            source: parsed,
            native,
            lowering,
        })
    }

    /// Human-readable summary of a classification
    pub fn report(&self, classified: &Classified) -> String {
        let arch = self.target.arch;
        let mut out = String::new();
        let _ = writeln!(out, "annotation: {}", classified.source.display(&self.names));
        let _ = writeln!(out, "native:     {}", self.zone.display(classified.native));
        let _ = writeln!(out, "target:     {} (word size {})", arch, arch.word_size());

        match &classified.lowering {
            Some(plan) => {
                for (i, argument) in plan.arguments.iter().enumerate() {
                    self.write_value(&mut out, &format!("arg {}", i), argument);
                }
                self.write_value(&mut out, "result", &plan.result);
            }
            None => {
                let value = arch.lower_value(&self.zone, classified.native);
                self.write_value(&mut out, "value", &value);
            }
        }
        out
    }

    fn write_value(&self, out: &mut String, label: &str, value: &ArgumentLowering) {
        let arch = self.target.arch;
        let ty = self.zone.get(value.declared);
        let parts: Vec<String> = value.parts.iter().map(|p| self.zone.render(*p)).collect();
        let _ = writeln!(
            out,
            "  {}: {} size={} stack-align={} field-align={} parts=[{}]",
            label,
            self.zone.display(value.declared),
            ty.size_in_bytes(),
            ty.alignment_in_bytes_stack(&arch),
            ty.alignment_in_bytes_field(&arch),
            parts.join(", ")
        );
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new(TargetConfig::default(), FrontendConfig::default())
    }
}
