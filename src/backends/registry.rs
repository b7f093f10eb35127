use std::collections::HashMap;

use super::cpp::CppAdapter;
use super::java::JavaAdapter;
use super::javascript::JavaScriptAdapter;
use super::python::PythonAdapter;
use super::{Backend, BackendContext, CompiledBackend, InterpretedBackend};
use crate::languages::{Language, LanguageTable};

/// Backend for `language`, wired to the toolchain from `table`
pub fn backend_for(
    language: Language,
    table: &LanguageTable,
    ctx: BackendContext,
) -> Box<dyn Backend> {
    let toolchain = table.toolchain(language);
    let compiler = |default: &str| toolchain.compiler.clone().unwrap_or_else(|| default.into());
    let runtime = |default: &str| toolchain.runtime.clone().unwrap_or_else(|| default.into());

    match language {
        Language::Java => Box::new(CompiledBackend::new(
            JavaAdapter::new(compiler("javac"), runtime("java")),
            ctx,
        )),
        Language::Cpp => Box::new(CompiledBackend::new(
            CppAdapter::new(compiler("g++"), toolchain.compile_args.clone()),
            ctx,
        )),
        Language::JavaScript => Box::new(InterpretedBackend::new(
            JavaScriptAdapter::new(runtime("node")),
            ctx,
        )),
        Language::Python => Box::new(InterpretedBackend::new(
            PythonAdapter::new(runtime("python3")),
            ctx,
        )),
    }
}

/// One backend per supported language
pub fn build_backends(
    table: &LanguageTable,
    ctx: &BackendContext,
) -> HashMap<Language, Box<dyn Backend>> {
    Language::ALL
        .into_iter()
        .map(|language| backend_for(language, table, ctx.clone()))
        .map(|backend| (backend.language(), backend))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::test_support;
    use crate::runner::mock::ScriptedRunner;
    use std::sync::Arc;

    #[test]
    fn test_every_language_has_a_backend() {
        let table = LanguageTable::embedded().unwrap();
        let (_root, ctx) = test_support::context(Arc::new(ScriptedRunner::default()));

        let backends = build_backends(&table, &ctx);
        assert_eq!(backends.len(), Language::ALL.len());
        for (language, backend) in &backends {
            assert_eq!(backend.language(), *language);
        }
    }
}
