use std::borrow::Cow;

use ironwinrm_xml::builder::Element;

use crate::cores::{Arguments, Attribute, Command, CommandLine, Tag, TagValue, Text};
use crate::soap::HeaderSet;
use crate::ws_management::{option_set, wsman_bool};

pub const CONSOLEMODE_STDIN_OPTION: &str = "WINRS_CONSOLEMODE_STDIN";
pub const SKIP_CMD_SHELL_OPTION: &str = "WINRS_SKIP_CMD_SHELL";

#[derive(Debug, Clone, Copy, PartialEq, Eq, typed_builder::TypedBuilder)]
pub struct CommandOptions {
    #[builder(default = true)]
    pub console_mode_stdin: bool,
    #[builder(default = false)]
    pub skip_cmd_shell: bool,
}

impl Default for CommandOptions {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl CommandOptions {
    pub fn option_set(&self) -> HeaderSet<'static> {
        option_set([
            (CONSOLEMODE_STDIN_OPTION, wsman_bool(self.console_mode_stdin)),
            (SKIP_CMD_SHELL_OPTION, wsman_bool(self.skip_cmd_shell)),
        ])
    }
}

#[derive(Debug, Clone)]
pub struct CommandLineValue<'a> {
    pub command: Option<Cow<'a, str>>,
    pub arguments: Vec<Cow<'a, str>>,
}

impl<'a> CommandLineValue<'a> {
    /// A literal command line. Unless cmd.exe is skipped the command is passed as one
    /// quoted argument to it.
    pub fn new(command: &'a str, arguments: &'a [String], options: &CommandOptions) -> Self {
        let command = if options.skip_cmd_shell {
            Cow::Borrowed(command)
        } else {
            Cow::Owned(format!("\"{command}\""))
        };

        Self {
            command: Some(command),
            arguments: arguments.iter().map(|a| Cow::Borrowed(a.as_str())).collect(),
        }
    }

    /// A pipeline invocation: no command text, one base64 PSRP argument.
    pub fn pipeline(arguments: String) -> Self {
        Self {
            command: None,
            arguments: vec![Cow::Owned(arguments)],
        }
    }

    /// The `rsp:CommandLine` body, with a client-chosen `CommandId` when given.
    pub fn into_body(self, command_id: Option<&'a str>) -> Element<'a> {
        let mut tag = Tag::from_name(CommandLine).with_value(self);
        if let Some(id) = command_id {
            tag = tag.with_attribute(Attribute::CommandId(id.into()));
        }
        tag.into_element()
    }
}

impl<'a> TagValue<'a> for CommandLineValue<'a> {
    fn append_to_element(self, mut element: Element<'a>) -> Element<'a> {
        let command_element = self.command.map_or_else(
            || Tag::from_name(Command).with_value(()).into_element(),
            |cmd| {
                Tag::from_name(Command)
                    .with_value(Text::from(cmd))
                    .into_element()
            },
        );

        element = element.add_child(command_element);

        for arg in self.arguments {
            let arg_element = Tag::from_name(Arguments)
                .with_value(Text::from(arg))
                .into_element();
            element = element.add_child(arg_element);
        }

        element
    }
}
