//! End-to-end field generation.

use log::debug;

use crate::error::Result;
use crate::field::{ask_questions, load_answers, Answers, FieldSpec};
use crate::options::Options;
use crate::prompt::{Prompter, Style};
use crate::template::TemplateSet;
use crate::validator::{validate, TermSource};
use crate::writer::{OutputBase, OutputPaths, OutputWriter};

/// Everything a successful run produced.
#[derive(Debug, Clone)]
pub struct Generated {
    pub spec: FieldSpec,
    pub paths: OutputPaths,
}

/// Runs the generation workflow with the given collaborators.
pub struct Generator<'a> {
    options: &'a Options,
    prompt: &'a mut dyn Prompter,
    source: &'a mut dyn TermSource,
}

impl<'a> Generator<'a> {
    pub fn new(
        options: &'a Options,
        prompt: &'a mut dyn Prompter,
        source: &'a mut dyn TermSource,
    ) -> Self {
        Self { options, prompt, source }
    }

    /// Asks for the field, validates it, renders the templates and writes
    /// the output tree.
    ///
    /// # Flow
    /// 1. Loads preloaded answers and templates, so bad inputs fail before
    ///    any question is asked
    /// 2. Asks the field questions
    /// 3. Reconciles vocabulary values with the database
    /// 4. Derives the machine name from the reconciled values
    /// 5. Renders and writes the four files
    pub fn run(&mut self) -> Result<Generated> {
        self.prompt
            .say(Style::Plain, "Please fill the following form to generate a Tripal Field.");

        let answers = match &self.options.answers {
            Some(path) => load_answers(path)?,
            None => Answers::new(),
        };
        let templates =
            TemplateSet::resolve(self.options.templates.as_deref(), self.options.field_type)?;
        debug!("Using {} templates", templates.field_type);

        let mut spec = ask_questions(&mut *self.prompt, &answers)?;

        let reconciliation = validate(&mut *self.source, &mut *self.prompt, &mut spec)?;
        debug!("Validation finished: {:?}", reconciliation);

        spec.derive_machine_name();
        if let Ok(values) = serde_json::to_string(&spec) {
            debug!("Field values: {}", values);
        }

        let files = templates.render(&spec);
        let writer = OutputWriter::new(OutputBase::from_option(self.options.output.as_deref()));
        let paths = writer.write(&spec, &files)?;

        self.prompt.say(Style::Success, "Field generated successfully.");
        self.prompt.say(
            Style::Success,
            &format!("The field can be found at {}", paths.field.display()),
        );

        Ok(Generated { spec, paths })
    }
}
