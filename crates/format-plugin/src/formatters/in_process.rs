use anyhow::Result;
use asset_api::AssetFileSystem;
use asset_api::AssetHandler;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;

use super::BackendError;
use super::FormatOutput;
use super::Formatter;
use super::FormatterCreator;
use crate::environment::Environment;

/// Lets asset handlers do file IO through an environment.
pub struct EnvironmentFileSystem<'a, TEnvironment: Environment> {
  environment: &'a TEnvironment,
}

impl<'a, TEnvironment: Environment> EnvironmentFileSystem<'a, TEnvironment> {
  pub fn new(environment: &'a TEnvironment) -> Self {
    EnvironmentFileSystem { environment }
  }
}

impl<TEnvironment: Environment> AssetFileSystem for EnvironmentFileSystem<'_, TEnvironment> {
  fn read_file(&self, file_path: &Path) -> Result<String> {
    self.environment.read_file(file_path)
  }

  fn write_file(&self, file_path: &Path, file_text: &str) -> Result<()> {
    self.environment.write_file(file_path, file_text)
  }
}

/// A formatter whose asset handler is compiled into this executable.
pub struct InProcessFormatterCreator<TEnvironment: Environment, THandler: AssetHandler> {
  environment: TEnvironment,
  handler: Arc<THandler>,
  source: String,
}

impl<TEnvironment: Environment, THandler: AssetHandler> InProcessFormatterCreator<TEnvironment, THandler> {
  pub fn new(environment: TEnvironment, handler: THandler) -> Self {
    let source = format!("builtin:{}", handler.name());
    InProcessFormatterCreator {
      environment,
      handler: Arc::new(handler),
      source,
    }
  }
}

impl<TEnvironment, THandler> FormatterCreator for InProcessFormatterCreator<TEnvironment, THandler>
where
  TEnvironment: Environment,
  THandler: AssetHandler + 'static,
  THandler::Configuration: 'static,
{
  fn type_name(&self) -> &str {
    self.handler.name()
  }

  fn source(&self) -> &str {
    &self.source
  }

  fn create(&self, config_yml: &str) -> Result<Box<dyn Formatter>> {
    let config = asset_api::resolve_config(self.handler.as_ref(), config_yml).map_err(|err| BackendError::ConfigValidation {
      type_name: self.type_name().to_string(),
      message: format!("{:#}", err),
    })?;
    Ok(Box::new(InProcessFormatter {
      environment: self.environment.clone(),
      handler: self.handler.clone(),
      config,
    }))
  }

  fn upgrade_config(&self, config_yml: &str) -> Result<String> {
    asset_api::upgrade_config(self.handler.as_ref(), config_yml)
  }
}

struct InProcessFormatter<TEnvironment: Environment, THandler: AssetHandler> {
  environment: TEnvironment,
  handler: Arc<THandler>,
  config: THandler::Configuration,
}

impl<TEnvironment: Environment, THandler: AssetHandler> Formatter for InProcessFormatter<TEnvironment, THandler> {
  fn type_name(&self) -> &str {
    self.handler.name()
  }

  fn format(&self, file_paths: &[PathBuf], list: bool, output: FormatOutput) -> Result<()> {
    let file_system = EnvironmentFileSystem::new(&self.environment);
    let mut stdout = Vec::new();
    let result = asset_api::format_files(self.handler.as_ref(), &file_system, &self.config, file_paths, list, &mut stdout);
    match output {
      FormatOutput::Stream => {
        if !stdout.is_empty() {
          self.environment.log(&String::from_utf8_lossy(&stdout));
        }
      }
      FormatOutput::Buffer(buffer) => buffer.extend_from_slice(&stdout),
    }
    result.map_err(|err| {
      BackendError::Execution {
        type_name: self.type_name().to_string(),
        message: format!("{:#}", err),
      }
      .into()
    })
  }
}

#[cfg(test)]
mod test {
  use pretty_assertions::assert_eq;
  use test_format_asset::SortImportsHandler;

  use super::*;
  use crate::environment::TestEnvironmentBuilder;

  #[test]
  fn should_format_through_environment() {
    let environment = TestEnvironmentBuilder::new()
      .write_file("/project/foo.go", "import (\n\t\"os\"\n\t\"fmt\"\n)\n")
      .build();
    let creator = InProcessFormatterCreator::new(environment.clone(), SortImportsHandler);
    assert_eq!(creator.type_name(), "sortimports");
    assert_eq!(creator.source(), "builtin:sortimports");

    let formatter = creator.create("").unwrap();
    let mut buffer = Vec::new();
    formatter
      .format(&[PathBuf::from("/project/foo.go")], true, FormatOutput::Buffer(&mut buffer))
      .unwrap();
    assert_eq!(String::from_utf8(buffer).unwrap(), "/project/foo.go\n");

    formatter.format(&[PathBuf::from("/project/foo.go")], false, FormatOutput::Stream).unwrap();
    assert_eq!(environment.read_file("/project/foo.go").unwrap(), "import (\n\t\"fmt\"\n\t\"os\"\n)\n");
  }

  #[test]
  fn should_error_for_invalid_config() {
    let creator = InProcessFormatterCreator::new(TestEnvironmentBuilder::new().build(), SortImportsHandler);
    let err = creator.create("other: 1").err().unwrap();
    assert!(matches!(err.downcast_ref::<BackendError>(), Some(BackendError::ConfigValidation { .. })));
  }

  #[test]
  fn should_error_when_handler_errors() {
    let environment = TestEnvironmentBuilder::new().write_file("/a.go", "should_error").build();
    let formatter = InProcessFormatterCreator::new(environment, SortImportsHandler).create("").unwrap();
    let err = formatter.format(&[PathBuf::from("/a.go")], false, FormatOutput::Stream).err().unwrap();
    assert_eq!(err.to_string(), "Formatter sortimports failed: Error formatting /a.go: Did error.");
  }
}
