use super::*;
use cfdstudy_core::error::Position;

const SAMPLE: &str = r#"<!DOCTYPE TS><TS>
    <context>
        <name>@default</name>
        <message>
            <source>CFDSTUDY_INVALID_SOLVER_NAME</source>
            <translation>%1 is an invalid name of solver ! It must be %2 or %3 !</translation>
        </message>
        <message>
            <source>INFO_DLG_CASE</source>
            <translation> Study Case %1 already exists ! </translation>
        </message>

    </context>
    <context>
        <name>InfoDialogHandler</name>
        <message>
            <source>DLG_OK_BUTTON_TEXT</source>
            <translation>OK</translation>
        </message>
    </context>
</TS>
"#;

fn format_error(src: &str) -> FormatError {
    match load(src) {
        Err(CatalogError::Format(e)) => e,
        other => panic!("expected format error, got {other:?}"),
    }
}

#[test]
fn test_load_sample() {
    let catalog = load(SAMPLE).unwrap();
    assert_eq!(catalog.contexts().len(), 2);
    assert_eq!(catalog.message_count(), 3);
    assert_eq!(catalog.header, Header::default());

    let names: Vec<&str> = catalog.contexts().iter().map(Context::name).collect();
    assert_eq!(names, ["@default", "InfoDialogHandler"]);

    let msg = catalog.lookup("InfoDialogHandler", "DLG_OK_BUTTON_TEXT").unwrap();
    assert_eq!(msg.translation.as_deref(), Some("OK"));
    assert_eq!(msg.status, TranslationStatus::Finished);
}

#[test]
fn test_surrounding_whitespace_preserved_in_translation() {
    let catalog = load(SAMPLE).unwrap();
    let msg = catalog.lookup("@default", "INFO_DLG_CASE").unwrap();
    assert_eq!(msg.translation.as_deref(), Some(" Study Case %1 already exists ! "));
}

#[test]
fn test_empty_documents_yield_empty_catalog() {
    for src in ["", "   \n\t", "<!DOCTYPE TS>", "<?xml version=\"1.0\"?>\n<!DOCTYPE TS><TS/>", "<TS></TS>"] {
        let catalog = load(src).unwrap();
        assert!(catalog.is_empty(), "{src:?} should load as an empty catalog");
    }
}

#[test]
fn test_header_attributes() {
    let catalog = load(r#"<TS version="2.1" language="fr_FR" sourcelanguage="en"></TS>"#).unwrap();
    assert_eq!(catalog.header.version.as_deref(), Some("2.1"));
    assert_eq!(catalog.header.language.as_deref(), Some("fr_FR"));
    assert_eq!(catalog.header.source_language.as_deref(), Some("en"));
}

#[test]
fn test_non_ascii_and_entities() {
    let src = "<TS><context><name>@default</name><message>\
               <source>ENV</source><translation>Édition de l&apos;environnement &amp; réglages</translation>\
               </message></context></TS>";
    let catalog = load(src).unwrap();
    assert_eq!(
        catalog.lookup("@default", "ENV").unwrap().translation.as_deref(),
        Some("Édition de l'environnement & réglages")
    );
}

#[test]
fn test_translation_type_and_comment() {
    let src = r#"<TS><context><name>RunCaseDialogHandler</name>
        <message>
            <source>RUNCASE_DLG_CAPTION</source>
            <comment>window title</comment>
            <translation type="unfinished"></translation>
        </message>
        <message>
            <source>RUNCASE_DLG_MODE_TITLE</source>
            <translation/>
        </message>
        <message>
            <source>RUNCASE_DLG_RUN_MODE_BTN_TEXT</source>
        </message>
    </context></TS>"#;
    let catalog = load(src).unwrap();
    let ctx = catalog.context("RunCaseDialogHandler").unwrap();

    let caption = ctx.get("RUNCASE_DLG_CAPTION").unwrap();
    assert_eq!(caption.status, TranslationStatus::Unfinished);
    assert_eq!(caption.comment.as_deref(), Some("window title"));
    assert_eq!(caption.translation.as_deref(), Some(""));

    assert_eq!(ctx.get("RUNCASE_DLG_MODE_TITLE").unwrap().translation.as_deref(), Some(""));
    assert_eq!(ctx.get("RUNCASE_DLG_RUN_MODE_BTN_TEXT").unwrap().translation, None);
}

#[test]
fn test_unknown_elements_skipped() {
    let src = r#"<TS><context><name>CopyDialogHandler</name>
        <message>
            <location filename="CopyDialogHandler.py" line="42"/>
            <source>COPY_DLG_CAPTION</source>
            <extracomment>shown <b>bold</b></extracomment>
            <translation>Copy file of parameters</translation>
        </message>
    </context></TS>"#;
    let catalog = load(src).unwrap();
    assert_eq!(
        catalog.lookup("CopyDialogHandler", "COPY_DLG_CAPTION").unwrap().translation.as_deref(),
        Some("Copy file of parameters")
    );
}

#[test]
fn test_plural_messages_skipped() {
    let src = r#"<TS><context><name>@default</name>
        <message numerus="yes">
            <source>%n file(s) copied</source>
            <translation>
                <numerusform>%n file copied</numerusform>
                <numerusform>%n files copied</numerusform>
            </translation>
        </message>
        <message numerus="no">
            <source>CFDSTUDY_MENU</source>
            <translation>CFDSTUDY</translation>
        </message>
    </context></TS>"#;
    let catalog = load(src).unwrap();
    let ctx = catalog.context("@default").unwrap();
    assert_eq!(ctx.len(), 1);
    assert!(catalog.lookup("@default", "%n file(s) copied").is_none());
    assert_eq!(
        catalog.lookup("@default", "CFDSTUDY_MENU").unwrap().translation.as_deref(),
        Some("CFDSTUDY")
    );
}

#[test]
fn test_duplicate_keys_last_wins() {
    let src = r#"<TS><context><name>RunCaseDialogHandler</name>
        <message><source>DLG_CANCEL_BUTTON_TEXT</source><translation>Cancel</translation></message>
        <message><source>DLG_CANCEL_BUTTON_TEXT</source><translation>Close</translation></message>
    </context></TS>"#;
    let catalog = load(src).unwrap();
    let ctx = catalog.context("RunCaseDialogHandler").unwrap();
    assert_eq!(ctx.len(), 2, "both occurrences are kept in document order");
    assert_eq!(
        ctx.get("DLG_CANCEL_BUTTON_TEXT").unwrap().translation.as_deref(),
        Some("Close")
    );
}

const DUPLICATE_CONTEXTS: &str = r#"<TS>
    <context><name>CopyDialogHandler</name>
        <message><source>COPY_DLG_CAPTION</source><translation>Copy</translation></message>
    </context>
    <context><name>InfoDialogHandler</name>
        <message><source>DLG_OK_BUTTON_TEXT</source><translation>OK</translation></message>
    </context>
    <context><name>CopyDialogHandler</name>
        <message><source>COPY_DLG_CAPTION</source><translation>Copy file of parameters</translation></message>
        <message><source>COPY_DLG_COPY_BUTTON</source><translation>Copy</translation></message>
    </context>
</TS>"#;

#[test]
fn test_duplicate_contexts_merge_by_default() {
    let catalog = load(DUPLICATE_CONTEXTS).unwrap();
    assert_eq!(catalog.contexts().len(), 2);
    assert_eq!(catalog.contexts()[0].name(), "CopyDialogHandler");
    assert_eq!(catalog.contexts()[0].len(), 3);
    assert_eq!(
        catalog.lookup("CopyDialogHandler", "COPY_DLG_CAPTION").unwrap().translation.as_deref(),
        Some("Copy file of parameters")
    );
}

#[test]
fn test_duplicate_contexts_rejected_when_configured() {
    let options = LoadOptions {
        duplicate_contexts: DuplicateContextPolicy::Reject,
    };
    let err = load_with(DUPLICATE_CONTEXTS, &options).unwrap_err();
    let CatalogError::Format(err) = err else {
        panic!("expected format error, got {err:?}");
    };
    assert!(err.message.contains("duplicate context \"CopyDialogHandler\""));
    assert_eq!(err.position.map(|p| p.line), Some(8));
}

#[test]
fn test_unterminated_context() {
    let err = format_error("<TS>\n  <context>\n    <name>@default</name>\n");
    assert_eq!(err.message, "unterminated element <context>");
    assert_eq!(err.position, Some(Position { line: 2, column: 3 }));
}

#[test]
fn test_mismatched_closing_tag() {
    let err = format_error("<TS><context><name>x</name></message></TS>");
    assert_eq!(err.message, "expected </context>, found </message>");
}

#[test]
fn test_missing_required_fields() {
    let err = format_error("<TS><context><message><source>A</source></message></context></TS>");
    assert_eq!(err.message, "<context> is missing <name>");

    let err = format_error("<TS><context><name>x</name><message><translation>A</translation></message></context></TS>");
    assert_eq!(err.message, "<message> is missing <source>");

    let err = format_error("<TS><context><name>x</name><message/></context></TS>");
    assert_eq!(err.message, "<message> is missing <source>");
}

#[test]
fn test_repeated_single_fields_rejected() {
    let err = format_error(
        "<TS><context><name>x</name><message><source>A</source>\
         <translation>1</translation><translation>2</translation></message></context></TS>",
    );
    assert_eq!(err.message, "duplicate <translation> in <message>");
}

#[test]
fn test_markup_inside_text_rejected() {
    let err = format_error("<TS><context><name>x<b>y</b></name></context></TS>");
    assert_eq!(err.message, "unexpected <b> inside <name>");
}

#[test]
fn test_unknown_translation_type_rejected() {
    let err = format_error(
        "<TS><context><name>x</name><message><source>A</source>\
         <translation type=\"done\">a</translation></message></context></TS>",
    );
    assert!(err.message.contains("unknown translation type \"done\""));
}

#[test]
fn test_wrong_root_and_trailing_content() {
    let err = format_error("<catalog></catalog>");
    assert_eq!(err.message, "expected <TS> root element, found <catalog>");

    let err = format_error("<TS></TS><TS></TS>");
    assert_eq!(err.message, "unexpected content after </TS>");

    let err = format_error("<TS></TS> trailing");
    assert_eq!(err.message, "unexpected content after </TS>");
}

#[test]
fn test_stray_text_between_elements_rejected() {
    let err = format_error("<TS><context>oops<name>x</name></context></TS>");
    assert_eq!(err.message, "unexpected text inside <context>");
}

#[test]
fn test_load_file_reads_from_disk() {
    let tmp = std::env::temp_dir().join("__cfdstudy_test_load_file__");
    let _ = std::fs::remove_dir_all(&tmp);
    std::fs::create_dir_all(&tmp).unwrap();
    let path = tmp.join("CFDSTUDY_msg_en.ts");
    std::fs::write(&path, SAMPLE).unwrap();

    let catalog = load_file(&path).unwrap();
    assert_eq!(catalog, load(SAMPLE).unwrap());

    let missing = load_file(tmp.join("absent.ts")).unwrap_err();
    assert!(matches!(missing, CatalogError::Io(_)));

    let _ = std::fs::remove_dir_all(&tmp);
}

#[test]
fn test_load_options_from_config() {
    let cfg = cfdstudy_core::config::parse("[catalog]\nduplicate_contexts = \"reject\"\n").unwrap();
    let options = LoadOptions::from(&cfg.catalog);
    assert_eq!(options.duplicate_contexts, DuplicateContextPolicy::Reject);
}
