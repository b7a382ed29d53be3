use std::borrow::Cow;

use ironwinrm_xml::builder::Element;

use crate::cores::{
    Attribute, CreationXml, Environment, IdleTimeOut, InputStreams, Namespace, OutputStreams,
    Shell, Tag, TagValue, Text, Time, Variable, WorkingDirectory,
};
use crate::soap::HeaderSet;
use crate::ws_management::{ResourceUri, option_set, wsman_bool};

pub const NOPROFILE_OPTION: &str = "WINRS_NOPROFILE";
pub const CODEPAGE_OPTION: &str = "WINRS_CODEPAGE";

/// Which remote shell resource a Shell is created against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ShellKind {
    #[default]
    Cmd,
    PowerShell,
}

impl ShellKind {
    pub fn resource_uri(self) -> ResourceUri {
        match self {
            Self::Cmd => ResourceUri::CmdShell,
            Self::PowerShell => ResourceUri::PowerShell,
        }
    }
}

/// Shell creation options. Only the options that are set are sent.
#[derive(Debug, Clone, typed_builder::TypedBuilder)]
pub struct ShellOptions {
    #[builder(default)]
    pub kind: ShellKind,
    #[builder(default = "stdin".to_owned(), setter(into))]
    pub input_streams: String,
    #[builder(default = "stdout stderr".to_owned(), setter(into))]
    pub output_streams: String,
    #[builder(default, setter(strip_option, into))]
    pub working_directory: Option<String>,
    #[builder(default, setter(strip_option))]
    pub codepage: Option<u32>,
    #[builder(default, setter(strip_option))]
    pub no_profile: Option<bool>,
    /// Seconds.
    #[builder(default, setter(strip_option))]
    pub idle_timeout: Option<u64>,
    #[builder(default, setter(into))]
    pub env_vars: Vec<(String, String)>,
    /// Base64 PSRP payload carried verbatim in `creationXml`.
    #[builder(default, setter(strip_option, into))]
    pub creation_xml: Option<String>,
}

impl Default for ShellOptions {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl ShellOptions {
    /// `WINRS_NOPROFILE` and `WINRS_CODEPAGE`, each only when supplied.
    pub fn option_set(&self) -> HeaderSet<'static> {
        let mut options = Vec::new();
        if let Some(no_profile) = self.no_profile {
            options.push((NOPROFILE_OPTION, wsman_bool(no_profile)));
        }
        if let Some(codepage) = self.codepage {
            options.push((CODEPAGE_OPTION, Cow::Owned(codepage.to_string())));
        }
        option_set(options)
    }

    /// The `rsp:Shell` body. `candidate_id` is written as the `ShellId` attribute.
    pub fn body<'a>(&'a self, candidate_id: Option<&'a str>) -> Element<'a> {
        let value = ShellValue::builder()
            .input_streams(Tag::new(self.input_streams.as_str()))
            .output_streams(Tag::new(self.output_streams.as_str()))
            .working_directory(self.working_directory.as_deref().map(Tag::new))
            .idle_time_out(self.idle_timeout.map(|secs| Tag::new(Time(secs))))
            .environment(
                self.env_vars
                    .iter()
                    .map(|(name, value)| {
                        Tag::new(value.as_str())
                            .with_attribute(Attribute::Name(name.as_str().into()))
                    })
                    .collect(),
            )
            .creation_xml(
                self.creation_xml
                    .as_deref()
                    .map(|payload| Tag::new(payload).with_declaration(Namespace::PowerShell)),
            )
            .build();

        let mut shell = Tag::from_name(Shell).with_value(value);
        if let Some(id) = candidate_id {
            shell = shell.with_attribute(Attribute::ShellId(id.into()));
        }
        shell.into_element()
    }
}

#[derive(Debug, Clone, typed_builder::TypedBuilder)]
pub struct ShellValue<'a> {
    pub input_streams: Tag<'a, Text<'a>, InputStreams>,
    pub output_streams: Tag<'a, Text<'a>, OutputStreams>,
    #[builder(default)]
    pub working_directory: Option<Tag<'a, Text<'a>, WorkingDirectory>>,
    #[builder(default)]
    pub idle_time_out: Option<Tag<'a, Time, IdleTimeOut>>,
    #[builder(default)]
    pub environment: Vec<Tag<'a, Text<'a>, Variable>>,
    #[builder(default)]
    pub creation_xml: Option<Tag<'a, Text<'a>, CreationXml>>,
}

impl<'a> TagValue<'a> for ShellValue<'a> {
    fn append_to_element(self, mut element: Element<'a>) -> Element<'a> {
        element = element
            .add_child(self.input_streams.into_element())
            .add_child(self.output_streams.into_element());

        if let Some(working_directory) = self.working_directory {
            element = element.add_child(working_directory.into_element());
        }
        if let Some(idle_time_out) = self.idle_time_out {
            element = element.add_child(idle_time_out.into_element());
        }
        if !self.environment.is_empty() {
            let variables = self.environment.into_iter().map(Tag::into_element).collect();
            let environment = Tag::from_name(Environment).with_value(()).into_element();
            element = element.add_child(environment.add_children(variables));
        }
        if let Some(creation_xml) = self.creation_xml {
            element = element.add_child(creation_xml.into_element());
        }

        element
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cores::OptionSet;
    use crate::soap::build_envelope;

    #[test]
    fn only_supplied_options_are_written() {
        assert!(ShellOptions::default().option_set().is_empty());

        let options = ShellOptions::builder().codepage(65001).build();
        let set = options.option_set();
        let entries = set.get(OptionSet).unwrap().children();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].key().discriminator, Some(CODEPAGE_OPTION));
        assert_eq!(entries[0].text(), Some("65001"));

        let options = ShellOptions::builder().codepage(437).no_profile(true).build();
        let xml = build_envelope([options.option_set()], None).unwrap();
        assert_eq!(xml.matches("<w:Option ").count(), 2);
        assert!(xml.contains(r#"<w:Option Name="WINRS_NOPROFILE">TRUE</w:Option>"#));
        assert!(xml.contains(r#"<w:Option Name="WINRS_CODEPAGE">437</w:Option>"#));
    }

    #[test]
    fn shell_body_carries_streams_and_environment() {
        let options = ShellOptions::builder()
            .working_directory(r"C:\Users")
            .idle_timeout(180)
            .env_vars(vec![("PATH".to_owned(), "C:\\bin".to_owned())])
            .build();

        let xml = build_envelope(Vec::new(), Some(options.body(None))).unwrap();

        assert!(xml.contains(concat!(
            "<rsp:Shell>",
            "<rsp:InputStreams>stdin</rsp:InputStreams>",
            "<rsp:OutputStreams>stdout stderr</rsp:OutputStreams>",
            r"<rsp:WorkingDirectory>C:\Users</rsp:WorkingDirectory>",
            "<rsp:IdleTimeOut>PT180S</rsp:IdleTimeOut>",
            r#"<rsp:Environment><rsp:Variable Name="PATH">C:\bin</rsp:Variable></rsp:Environment>"#,
            "</rsp:Shell>"
        )));
    }

    #[test]
    fn powershell_shell_declares_creation_xml_namespace() {
        let options = ShellOptions::builder()
            .kind(ShellKind::PowerShell)
            .creation_xml("AAAAAAAAAAE=")
            .build();

        let xml = build_envelope(
            Vec::new(),
            Some(options.body(Some("9F1B7D62-3B8E-4C1A-A1C4-0D2E6F0B5A11"))),
        )
        .unwrap();

        assert!(xml.contains(r#"<rsp:Shell ShellId="9F1B7D62-3B8E-4C1A-A1C4-0D2E6F0B5A11">"#));
        assert!(xml.contains(
            r#"<creationXml xmlns="http://schemas.microsoft.com/powershell">AAAAAAAAAAE=</creationXml>"#
        ));
        assert_eq!(options.kind.resource_uri(), ResourceUri::PowerShell);
    }
}
