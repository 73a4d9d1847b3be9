use tt_parser::tt::formats::to_treeviz_str;
use tt_parser::tt::DocumentLoader;

#[test]
fn test_treeviz_document() {
    let array = DocumentLoader::from_string("#title Hello\n##sub World\nPlain paragraph\n")
        .parse()
        .unwrap();
    // "Plain paragraph" is part of the ##sub run
    insta::assert_snapshot!(to_treeviz_str(&array, "doc.tt").trim_end(), @r"
    ⧉ doc.tt
    └─ § title: HelloWorld\nPlain parag...
      ├─ ◦ Hello
      └─ § sub: World\nPlain paragraph
        └─ ◦ World\nPlain paragraph
    ");
}

#[test]
fn test_treeviz_inline_and_id() {
    let array = DocumentLoader::from_string("#toc#\n#ref|anchor /*b*/this*/ now\n")
        .parse()
        .unwrap();
    insta::assert_snapshot!(to_treeviz_str(&array, "inline.tt").trim_end(), @r"
    ⧉ inline.tt
    ├─ # toc
    └─ § ref: this nowanchor
      ├─ ¶ this now
      │ ├─ # b: this
      │ └─ ◦  now
      └─ ⌗ _id_name: anchor
    ");
}
