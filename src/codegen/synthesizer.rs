//! Source synthesis from the translation store and the template set.

use chrono::NaiveDate;
use thiserror::Error;

use super::templates::{
    CodeTemplates,
    TemplateError,
    section,
};
use crate::host::types::TypeResolver;
use crate::store::{
    StoreError,
    TranslationStore,
};
use crate::text::macros;

#[derive(Error, Debug)]
pub enum SynthesisError {
    #[error(transparent)]
    Template(#[from] TemplateError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Class {class_name} not found in your project to translate")]
    MissingType { class_name: String },

    #[error("Class {class_name} not found in your English language file")]
    ClassNotInEnglish { class_name: String },

    #[error(
        "'{class_name}' does not contain a definition for '{member}'. Please check - is property marked as public?"
    )]
    MissingMember { class_name: String, member: String },
}

/// Placeholder → value pairs for one template expansion.
type Values<'v> = [(&'v str, &'v str)];

/// Expands templates against one store.
///
/// In strict mode a class or member the host does not define is an error;
/// otherwise it is skipped.
pub struct Synthesizer<'a> {
    /// Source of classes, properties and directives.
    store: &'a TranslationStore,
    /// Effective template set.
    templates: &'a CodeTemplates,
    /// Host type lookup.
    types: &'a dyn TypeResolver,
    /// Fail instead of skipping unknown classes and members.
    strict: bool,
}

impl<'a> Synthesizer<'a> {
    #[must_use]
    pub fn new(
        store: &'a TranslationStore,
        templates: &'a CodeTemplates,
        types: &'a dyn TypeResolver,
    ) -> Self {
        Self { store, templates, types, strict: false }
    }

    #[must_use]
    pub const fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Expands one template. Placeholders without a value are kept.
    fn fill(&self, name: &str, values: &Values<'_>) -> Result<String, SynthesisError> {
        let template = self.templates.get(name)?;
        Ok(macros::expand(template, |placeholder| {
            values.iter().find(|(key, _)| *key == placeholder).map(|(_, value)| (*value).to_string())
        }))
    }

    /// Expands `name` once per class and concatenates the results.
    fn fill_per_class(&self, name: &str, classes: &[&str]) -> Result<String, SynthesisError> {
        classes.iter().try_fold(String::new(), |mut text, class_name| {
            text.push_str(&self.fill(name, &[("ClassName", *class_name)])?);
            Ok(text)
        })
    }

    /// Builds the whole unit from the `Code` template.
    ///
    /// `usings` and `macros` are expanded in the given order. Classes come from
    /// every language of the store, in first-seen order.
    pub fn synthesize(
        &self,
        usings: &[String],
        macros: &[String],
        generated_on: NaiveDate,
    ) -> Result<String, SynthesisError> {
        let english = self.store.english_classes()?;
        let classes = self.store.all_classes();

        let locales = self.store.all_locales().map(|(locale, _)| locale).collect::<Vec<_>>().join(", ");
        let date = generated_on.format("%Y-%m-%d").to_string();

        let mut using_block = String::new();
        for namespace in usings {
            using_block.push_str(&self.fill(section::USING, &[("NamespaceName", namespace.as_str())])?);
        }

        let static_classes: Vec<&str> = classes
            .iter()
            .copied()
            .filter(|class_name| {
                english.get(*class_name).is_some_and(|properties| {
                    self.store.is_static_class(class_name) || properties.has_static()
                }) && self.types.find_type(class_name).is_some()
            })
            .collect();
        let translate_block = self.fill_per_class(section::TRANSLATE_CLASS, &static_classes)?;
        let remember_block = self.fill_per_class(section::REMEMBER_CLASS, &static_classes)?;
        let restore_block = self.fill_per_class(section::RESTORE_CLASS, &static_classes)?;

        let mut class_translation = String::new();
        for class_name in &classes {
            class_translation.push_str(&self.class_block(class_name)?);
        }

        let mut macro_block = String::new();
        for name in macros {
            let escaped = name.replace('"', "\\\"");
            macro_block.push_str(
                &self.fill(section::MACRO, &[("MacroName", escaped.as_str()), ("MacroCode", name.as_str())])?,
            );
        }

        tracing::debug!(
            "Synthesized {} classes ({} static), {} usings, {} macros",
            classes.len(),
            static_classes.len(),
            usings.len(),
            macros.len()
        );

        self.fill(
            section::CODE,
            &[
                ("DateTime", date.as_str()),
                ("Locales", locales.as_str()),
                ("Using", using_block.as_str()),
                ("TranslateClass", translate_block.as_str()),
                ("RememberClass", remember_block.as_str()),
                ("RestoreClass", restore_block.as_str()),
                ("ClassTranslation", class_translation.as_str()),
                ("Macro", macro_block.as_str()),
            ],
        )
    }

    /// Builds the dynamic and static blocks of one class.
    ///
    /// A property goes to the static block when it is marked static or its class
    /// is declared `static`. Members the host type lacks are skipped.
    pub fn class_block(&self, class_name: &str) -> Result<String, SynthesisError> {
        let Some(descriptor) = self.types.find_type(class_name) else {
            if self.strict {
                return Err(SynthesisError::MissingType { class_name: class_name.to_string() });
            }
            tracing::debug!("Skipping class {}: type not found", class_name);
            return Ok(String::new());
        };

        let english = self.store.english_classes()?;
        let Some(properties) = english.get(class_name) else {
            if self.strict {
                return Err(SynthesisError::ClassNotInEnglish { class_name: class_name.to_string() });
            }
            tracing::debug!("Skipping class {}: not in the English language", class_name);
            return Ok(String::new());
        };

        let declared_static = self.store.is_static_class(class_name);
        let mut dynamic = MemberBlocks::default();
        let mut statics = MemberBlocks::default();

        for (property_name, property) in properties {
            if !self.types.member_exists(property_name, &descriptor) {
                if self.strict {
                    return Err(SynthesisError::MissingMember {
                        class_name: class_name.to_string(),
                        member: property_name.clone(),
                    });
                }
                tracing::debug!("Skipping {}.{}: member not found", class_name, property_name);
                continue;
            }

            let values = [("ClassName", class_name), ("PropertyName", property_name.as_str())];
            if property.is_static || declared_static {
                statics.remember.push_str(&self.fill(section::STATIC_CLASS_REMEMBER, &values)?);
                statics.translate.push_str(&self.fill(section::STATIC_CLASS_TRANSLATE, &values)?);
            } else {
                dynamic.remember.push_str(&self.fill(section::DYNAMIC_CLASS_REMEMBER, &values)?);
                dynamic.translate.push_str(&self.fill(section::DYNAMIC_CLASS_TRANSLATE, &values)?);
            }
        }

        let mut block = String::new();
        if !declared_static {
            block.push_str(&self.fill(
                section::DYNAMIC_CLASS,
                &[
                    ("ClassName", class_name),
                    ("DynamicClassRemember", dynamic.remember.as_str()),
                    ("DynamicClassTranslate", dynamic.translate.as_str()),
                ],
            )?);
        }
        if declared_static || properties.has_static() {
            block.push_str(&self.fill(
                section::STATIC_CLASS,
                &[
                    ("ClassName", class_name),
                    ("StaticClassRemember", statics.remember.as_str()),
                    ("StaticClassTranslate", statics.translate.as_str()),
                ],
            )?);
        }
        Ok(block)
    }
}

/// Per-property fragments collected for one class block.
#[derive(Debug, Default)]
struct MemberBlocks {
    /// Expanded `*ClassRemember` fragments.
    remember: String,
    /// Expanded `*ClassTranslate` fragments.
    translate: String,
}

/// Namespaces to import: those of every resolvable class, then the declared
/// `using`s, then `implicit`. Duplicates are dropped.
#[must_use]
pub fn compile_usings(
    store: &TranslationStore,
    types: &dyn TypeResolver,
    implicit: &[String],
) -> Vec<String> {
    let mut usings: Vec<String> = Vec::new();
    let discovered = store
        .all_classes()
        .into_iter()
        .filter_map(|class_name| types.find_type(class_name)?.namespace);
    let declared = store.code_usings().iter().chain(implicit).cloned();

    for namespace in discovered.chain(declared) {
        if !namespace.is_empty() && !usings.contains(&namespace) {
            usings.push(namespace);
        }
    }
    usings
}

/// Module references: those of every resolvable class, then the declared
/// `module`/`dll` entries. Duplicates are dropped ignoring case.
#[must_use]
pub fn compile_modules(store: &TranslationStore, types: &dyn TypeResolver) -> Vec<String> {
    let mut modules: Vec<String> = Vec::new();
    let discovered = store
        .all_classes()
        .into_iter()
        .filter_map(|class_name| types.find_type(class_name)?.module);
    let declared = store.code_modules().iter().cloned();

    for module in discovered.chain(declared) {
        if !module.is_empty() && !modules.iter().any(|known| known.eq_ignore_ascii_case(&module)) {
            modules.push(module);
        }
    }
    modules
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use googletest::prelude::*;
    use rstest::*;

    use super::*;
    use crate::host::types::TypeDescriptor;
    use crate::input::lang;
    use crate::test_utils::FakeTypes;

    const COMPACT_TEMPLATES: &str = "\
@Code
// $(DateTime) $(Locales)
$(Using)$(TranslateClass)$(RememberClass)$(RestoreClass)$(ClassTranslation)$(Macro)
@Using
using $(NamespaceName);
@TranslateClass
translate $(ClassName)
@RememberClass
remember $(ClassName)
@RestoreClass
restore $(ClassName)
@DynamicClass
class $(ClassName) {
$(DynamicClassRemember)$(DynamicClassTranslate)}
@DynamicClassRemember
  r $(ClassName).$(PropertyName)
@DynamicClassTranslate
  t $(ClassName).$(PropertyName)
@StaticClass
static $(ClassName) {
$(StaticClassRemember)$(StaticClassTranslate)}
@StaticClassRemember
  sr $(ClassName).$(PropertyName)
@StaticClassTranslate
  st $(ClassName).$(PropertyName)
@Macro
macro \"$(MacroName)\" = $(MacroCode)
";

    #[fixture]
    fn store() -> TranslationStore {
        let mut store = TranslationStore::new();
        store.set_locale("en", "English");
        store.set_locale("pl", "Polski");
        lang::read_str(
            "English",
            "static Messages\nusing System.Drawing\ndll forms.dll, DEMO.EXE\n\
             (Form1)Text = Main $(User)\n(Form1)button1.Text = OK\n!(Form1)Title = T\n\
             (Messages)Saved = Saved\n(Ghost)Text = boo",
            &mut store,
        )
        .unwrap();
        lang::read_str("Polski", "(Form1)Text = Główne\n(Extra)Text = x", &mut store).unwrap();
        store
    }

    #[fixture]
    fn types() -> FakeTypes {
        FakeTypes::new()
            .with_type(
                TypeDescriptor::new("Form1").with_namespace("Demo").with_module("Demo.exe"),
                &["Text", "button1.Text", "Title"],
            )
            .with_type(TypeDescriptor::new("Messages").with_namespace("Demo"), &["Saved"])
            .with_type(TypeDescriptor::new("Extra"), &["Text"])
    }

    #[fixture]
    fn templates() -> CodeTemplates {
        let mut templates = CodeTemplates::new();
        templates.load_text(COMPACT_TEMPLATES);
        templates
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()
    }

    #[rstest]
    fn test_synthesize_lenient(store: TranslationStore, types: FakeTypes, templates: CodeTemplates) {
        let synthesizer = Synthesizer::new(&store, &templates, &types);
        let usings = vec!["Demo".to_string(), "System".to_string()];

        let source = synthesizer.synthesize(&usings, &store.macros(), date()).unwrap();

        let expected = [
            "// 2024-05-01 en, pl\n",
            "using Demo;\nusing System;\n",
            "translate Form1\ntranslate Messages\n",
            "remember Form1\nremember Messages\n",
            "restore Form1\nrestore Messages\n",
            "class Form1 {\n",
            "  r Form1.Text\n  r Form1.button1.Text\n",
            "  t Form1.Text\n  t Form1.button1.Text\n",
            "}\n",
            "static Form1 {\n  sr Form1.Title\n  st Form1.Title\n}\n",
            "static Messages {\n  sr Messages.Saved\n  st Messages.Saved\n}\n",
            "macro \"User\" = User\n",
            "\n",
        ]
        .concat();
        assert_eq!(source, expected);
    }

    #[rstest]
    fn test_synthesize_is_deterministic(
        store: TranslationStore,
        types: FakeTypes,
        templates: CodeTemplates,
    ) {
        let synthesizer = Synthesizer::new(&store, &templates, &types);

        let first = synthesizer.synthesize(&[], &store.macros(), date()).unwrap();
        let second = synthesizer.synthesize(&[], &store.macros(), date()).unwrap();

        assert_eq!(first, second);
    }

    #[rstest]
    fn test_strict_reports_missing_type(
        store: TranslationStore,
        types: FakeTypes,
        templates: CodeTemplates,
    ) {
        let synthesizer = Synthesizer::new(&store, &templates, &types).strict(true);

        let result = synthesizer.synthesize(&[], &[], date());

        assert!(matches!(result, Err(SynthesisError::MissingType { ref class_name }) if class_name == "Ghost"));
    }

    #[rstest]
    fn test_strict_reports_class_missing_from_english(
        store: TranslationStore,
        types: FakeTypes,
        templates: CodeTemplates,
    ) {
        let synthesizer = Synthesizer::new(&store, &templates, &types).strict(true);

        let result = synthesizer.class_block("Extra");

        assert!(matches!(result, Err(SynthesisError::ClassNotInEnglish { .. })));
    }

    #[rstest]
    fn test_missing_member(mut store: TranslationStore, types: FakeTypes, templates: CodeTemplates) {
        store.set_property("English", "Form1", "label9.Text", "gone", false);

        let lenient = Synthesizer::new(&store, &templates, &types).class_block("Form1").unwrap();
        let strict = Synthesizer::new(&store, &templates, &types).strict(true).class_block("Form1");

        assert!(!lenient.contains("label9"));
        assert!(matches!(
            strict,
            Err(SynthesisError::MissingMember { ref class_name, ref member })
                if class_name == "Form1" && member == "label9.Text"
        ));
    }

    #[rstest]
    fn test_macro_name_quotes_are_escaped(types: FakeTypes, templates: CodeTemplates) {
        let mut store = TranslationStore::new();
        store.set_locale("en", "English");
        store.set_property("English", "Form1", "Text", "x", false);
        let macros = vec![r#"Now.ToString("d")"#.to_string()];

        let source = Synthesizer::new(&store, &templates, &types).synthesize(&[], &macros, date()).unwrap();

        assert!(source.contains(r#"macro "Now.ToString(\"d\")" = Now.ToString("d")"#));
    }

    #[googletest::test]
    fn test_requires_english() {
        let store = TranslationStore::new();
        let templates = CodeTemplates::new();
        let types = FakeTypes::new();

        let result = Synthesizer::new(&store, &templates, &types).synthesize(&[], &[], date());

        expect_that!(matches!(result, Err(SynthesisError::Store(StoreError::MissingEnglishTier))), eq(true));
    }

    #[rstest]
    fn test_compile_usings(store: TranslationStore, types: FakeTypes) {
        let implicit = vec!["System".to_string(), "Demo".to_string()];

        let usings = compile_usings(&store, &types, &implicit);

        assert_eq!(usings, vec!["Demo", "System.Drawing", "System"]);
    }

    #[rstest]
    fn test_compile_modules(store: TranslationStore, types: FakeTypes) {
        let modules = compile_modules(&store, &types);

        assert_eq!(modules, vec!["Demo.exe", "forms.dll"]);
    }
}
