use crate::callback::Callback;
use crate::result::{RecordSet, TextResults};
use anyhow::Result;
use p4bridge_record::DecodedRecord;
use p4bridge_types::{Diagnostic, MergeRequest, MergeResolution, Severity};

/// Answers the accumulating callbacks can give back to the engine.
#[derive(Default)]
struct ReplyData {
    input_data: String,
    login_password: Option<String>,
    prompt_handler: Option<Box<dyn FnMut(&str) -> String>>,
}

impl ReplyData {
    fn answer_prompt(&mut self, message: &str) -> String {
        // Login prompts are short-circuited so a stored password never has
        // to round-trip through user code.
        if message == "Enter password: " {
            if let Some(password) = &self.login_password {
                return password.clone();
            }
        }
        match &mut self.prompt_handler {
            Some(handler) => handler(message),
            None => String::new(),
        }
    }
}

/// Callback that populates a [`RecordSet`]: the machinery behind the
/// plain `run` path. Also useful directly as a delegate, wrapping one to
/// intercept events while still getting the populated result.
#[derive(Default)]
pub struct RecordSetBuilder {
    result: RecordSet,
    reply: ReplyData,
    spec_def: Option<String>,
}

impl RecordSetBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Content replayed when the engine requests form input.
    pub fn set_input_data(&mut self, data: impl Into<String>) {
        self.reply.input_data = data.into();
    }

    pub fn set_login_password(&mut self, password: impl Into<String>) {
        self.reply.login_password = Some(password.into());
    }

    pub fn on_prompt(&mut self, handler: impl FnMut(&str) -> String + 'static) {
        self.reply.prompt_handler = Some(Box::new(handler));
    }

    pub fn into_result(self) -> RecordSet {
        self.result
    }
}

impl Callback for RecordSetBuilder {
    fn output_record(&mut self, record: DecodedRecord) -> Result<()> {
        self.result.add_record(record);
        Ok(())
    }

    fn output_diagnostic(&mut self, diagnostic: Diagnostic) -> Result<()> {
        self.result.output_mut().add_diagnostic(diagnostic);
        Ok(())
    }

    fn output_info(&mut self, data: &str) -> Result<()> {
        self.result.output_mut().add_info(data);
        Ok(())
    }

    fn output_content(&mut self, chunk: &[u8], is_text: bool) -> Result<()> {
        if is_text {
            self.result
                .output_mut()
                .add_info(String::from_utf8_lossy(chunk).into_owned());
        } else {
            self.result.output_mut().set_binary_output(chunk.to_vec());
        }
        Ok(())
    }

    fn input_data(&mut self, buffer: &mut String) -> Result<()> {
        buffer.push_str(&self.reply.input_data);
        Ok(())
    }

    fn prompt(&mut self, message: &str, response: &mut String) -> Result<()> {
        *response = self.reply.answer_prompt(message);
        Ok(())
    }

    fn resolve(&mut self, _merge: &MergeRequest) -> Result<MergeResolution> {
        // Accumulation has no merge story; resolves need a real callback.
        Err(anyhow::Error::new(crate::Error::MergeUnsupported))
    }

    fn finished(&mut self) -> Result<()> {
        if let Some(spec_def) = self.spec_def.take() {
            self.result.output_mut().set_spec_def(spec_def);
        }
        Ok(())
    }

    fn set_spec_def(&mut self, spec_def: &str) {
        self.spec_def = Some(spec_def.to_string());
    }
}

/// Callback that populates [`TextResults`] for the unparsed `run` path.
/// Info-grade messages join the raw output stream, the way the command
/// would have printed them to stdout.
#[derive(Default)]
pub struct TextResultsBuilder {
    result: TextResults,
    reply: ReplyData,
    spec_def: Option<String>,
}

impl TextResultsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_input_data(&mut self, data: impl Into<String>) {
        self.reply.input_data = data.into();
    }

    pub fn set_login_password(&mut self, password: impl Into<String>) {
        self.reply.login_password = Some(password.into());
    }

    pub fn on_prompt(&mut self, handler: impl FnMut(&str) -> String + 'static) {
        self.reply.prompt_handler = Some(Box::new(handler));
    }

    pub fn into_result(self) -> TextResults {
        self.result
    }
}

impl Callback for TextResultsBuilder {
    fn output_record(&mut self, _record: DecodedRecord) -> Result<()> {
        // Untagged runs do not produce records; one arriving anyway has
        // nowhere to go and is dropped.
        Ok(())
    }

    fn output_diagnostic(&mut self, diagnostic: Diagnostic) -> Result<()> {
        if diagnostic.severity() <= Severity::Info {
            self.result.add_output(diagnostic.text());
        }
        self.result.output_mut().add_diagnostic(diagnostic);
        Ok(())
    }

    fn output_info(&mut self, data: &str) -> Result<()> {
        self.result.add_output(data);
        Ok(())
    }

    fn output_content(&mut self, chunk: &[u8], is_text: bool) -> Result<()> {
        if is_text {
            self.result
                .add_output(String::from_utf8_lossy(chunk).into_owned());
        } else {
            self.result.output_mut().set_binary_output(chunk.to_vec());
        }
        Ok(())
    }

    fn input_data(&mut self, buffer: &mut String) -> Result<()> {
        buffer.push_str(&self.reply.input_data);
        Ok(())
    }

    fn prompt(&mut self, message: &str, response: &mut String) -> Result<()> {
        *response = self.reply.answer_prompt(message);
        Ok(())
    }

    fn resolve(&mut self, _merge: &MergeRequest) -> Result<MergeResolution> {
        Err(anyhow::Error::new(crate::Error::MergeUnsupported))
    }

    fn finished(&mut self) -> Result<()> {
        if let Some(spec_def) = self.spec_def.take() {
            self.result.output_mut().set_spec_def(spec_def);
        }
        Ok(())
    }

    fn set_spec_def(&mut self, spec_def: &str) {
        self.spec_def = Some(spec_def.to_string());
    }
}
