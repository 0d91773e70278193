//! End-to-end rendering against a catalog snapshot.

mod common;

use cadence_api::{
    DocumentAssembler, Format, IncludeSet, RenderContext, Renderer, Window, XmlFlavor, paginate,
};
use cadence_model::{EntityKind, PlaylistRef, Song};
use cadence_serde::{KeyedEntry, clean_body};
use cadence_serde::xml::check_well_formed;
use common::{FORMAT_TOKENS, config, context, generated_at, library};
use quick_xml::Reader;
use quick_xml::events::Event;

type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

#[test]
fn test_unlimited_window_returns_everything_with_catalog_total() -> Result<()> {
    let ids = [103u64, 101, 102];
    let page = paginate(&ids, Window::new(0, 0), true, 250);
    assert_eq!(page.items, &ids);
    assert_eq!(page.total_count, 250);

    let config = config();
    let library = library();
    let renderer = Renderer::new(&config, &library)?;
    let xml = renderer.songs(&ids, &context(Format::default()))?;
    assert!(xml.contains("<total_count>250</total_count>"));
    assert_eq!(xml.matches("<song id=").count(), 3);
    Ok(())
}

#[test]
fn test_round_trip_scenario() -> Result<()> {
    let config = config();
    let library = library();
    let renderer = Renderer::new(&config, &library)?;
    let ctx = context(Format::default()).with_user(7).with_window(0, 2);

    let xml = renderer.songs(&[101, 102, 103], &ctx)?;
    check_well_formed(&xml)?;

    assert_eq!(xml.matches("<song id=").count(), 2);
    assert!(xml.contains("<song id=\"101\">"));
    assert!(xml.contains("<song id=\"102\">"));
    assert!(!xml.contains("<song id=\"103\">"));
    assert!(xml.contains("<total_count>250</total_count>"));

    assert!(xml.contains("<title><![CDATA[Ready Lets Go]]></title>"));
    assert!(xml.contains("<artist id=\"1\"><![CDATA[Boards of Canada]]></artist>"));
    assert!(xml.contains("<album id=\"10\"><![CDATA[Geogaddi]]></album>"));
    assert!(xml.contains("<track>1</track>"));
    assert!(xml.contains("<time>59</time>"));
    assert!(xml.contains("<track>2</track>"));
    assert!(xml.contains("<time>321</time>"));

    // user 7 rated 101 and flagged 102
    assert!(xml.contains("<preciserating>4</preciserating>"));
    assert!(xml.contains("<averagerating>3</averagerating>"));
    assert_eq!(xml.matches("<flag>1</flag>").count(), 1);
    Ok(())
}

#[test]
fn test_envelope_symmetry_for_every_format() -> Result<()> {
    let config = config();
    let library = library();
    let renderer = Renderer::new(&config, &library)?;
    let assembler = DocumentAssembler::new(&config, generated_at());

    for token in FORMAT_TOKENS {
        let format: Format = token.parse()?;
        let document = renderer.songs(&[101, 102], &context(format))?;
        match format {
            Format::Xml(flavor) => {
                let envelope = assembler.envelope(flavor, None);
                assert!(document.starts_with(&envelope.header), "{} header", token);
                assert!(document.ends_with(&envelope.footer), "{} footer", token);
                check_well_formed(&document)?;
            }
            Format::Json => {
                let value: serde_json::Value = serde_json::from_str(&document)?;
                assert_eq!(value["total_count"], 250);
                assert_eq!(value["song"].as_array().map(Vec::len), Some(2));
            }
        }
    }
    Ok(())
}

#[test]
fn test_flavors_render_media_as_track_entries() -> Result<()> {
    let config = config();
    let library = library();
    let renderer = Renderer::new(&config, &library)?;

    let xspf = renderer.songs(&[101], &context(Format::Xml(XmlFlavor::Xspf)))?;
    assert!(xspf.contains("    <track>\n      <location>"));
    assert!(!xspf.contains("total_count"));

    let itunes = renderer.songs(&[101], &context(Format::Xml(XmlFlavor::Itunes)))?;
    assert!(itunes.contains("<key>Track ID</key>"));
    assert!(itunes.contains("<date>2023-11-14T22:13:20Z</date>"));

    let rss = renderer.songs(&[101], &context(Format::Xml(XmlFlavor::Rss)))?;
    assert!(rss.contains("<item>"));
    assert!(rss.contains("<pubDate>"));

    // non-media kinds stay generic records inside any flavor
    let albums = renderer.albums(&[10], &IncludeSet::none(), &context(Format::Xml(XmlFlavor::Xspf)))?;
    check_well_formed(&albums)?;
    assert!(albums.contains("<album id=\"10\">"));
    Ok(())
}

#[test]
fn test_fragments_have_no_envelope() -> Result<()> {
    let config = config();
    let library = library();
    let renderer = Renderer::new(&config, &library)?;
    let assembler = DocumentAssembler::new(&config, generated_at());

    let body = "<song id=\"1\">\u{0}<title>x</title></song>\n";
    for token in FORMAT_TOKENS {
        let format: Format = token.parse()?;
        assert_eq!(assembler.assemble(body, format, false, None)?, clean_body(body));
    }

    let ctx = context(Format::default()).fragment().with_window(0, 1);
    let fragment = renderer.songs(&[101, 102], &ctx)?;
    assert!(fragment.starts_with("<song id=\"101\">"));
    assert!(!fragment.contains("<?xml"));
    assert!(!fragment.contains("total_count"));
    // fragments are never paginated
    assert_eq!(fragment.matches("<song id=").count(), 2);
    Ok(())
}

#[test]
fn test_hostile_text_is_never_emitted_verbatim() -> Result<()> {
    let config = config();
    let mut library = library();
    library.insert(Song {
        id: 104,
        title: "End]]>Of\u{0}Data\u{1B}".into(),
        comment: "<script>&</script>".into(),
        track: 4,
        time: 12,
        ..Default::default()
    });
    let renderer = Renderer::new(&config, &library)?;

    let xml = renderer.songs(&[104], &context(Format::default()))?;
    check_well_formed(&xml)?;
    assert!(!xml.contains("End]]>Of"));
    assert!(!xml.contains('\u{0}'));
    assert!(xml.contains("<title>End]]&gt;OfData</title>"));
    assert!(xml.contains("<comment><![CDATA[<script>&</script>]]></comment>"));
    assert!(xml.contains("<track>4</track>"));
    assert!(!xml.contains("<track><![CDATA["));

    let json = renderer.songs(&[104], &context(Format::Json))?;
    assert!(!json.contains("\\u0000"));
    assert!(!json.contains("\\u001b"));
    let value: serde_json::Value = serde_json::from_str(&json)?;
    assert_eq!(value["song"][0]["title"], "End]]>OfData");
    assert_eq!(value["song"][0]["comment"], "<script>&</script>");
    assert_eq!(value["song"][0]["track"], 4);
    Ok(())
}

#[test]
fn test_smart_playlist_without_limit_reports_5000_items() -> Result<()> {
    let config = config();
    let library = library();
    let renderer = Renderer::new(&config, &library)?;
    let refs = [PlaylistRef::Smart(3), PlaylistRef::Real(4)];

    let xml = renderer.playlists(&refs, &IncludeSet::none(), &context(Format::default()))?;
    assert!(xml.contains("<playlist id=\"smart_3\">"));
    assert!(xml.contains("<items>5000</items>"));
    assert!(xml.contains("<playlist id=\"4\">"));
    assert!(xml.contains("<items>2</items>"));

    let json = renderer.playlists(&refs, &IncludeSet::none(), &context(Format::Json))?;
    let value: serde_json::Value = serde_json::from_str(&json)?;
    assert_eq!(value["playlist"][0]["items"], 5000);
    Ok(())
}

#[test]
fn test_requested_include_with_no_children_keeps_container() -> Result<()> {
    let config = config();
    let library = library();
    let renderer = Renderer::new(&config, &library)?;
    let includes = IncludeSet::parse("albums")?;

    let xml = renderer.artists(&[2], &includes, &context(Format::default()))?;
    assert!(xml.contains("<albums></albums>"));

    let json = renderer.artists(&[2], &includes, &context(Format::Json))?;
    let value: serde_json::Value = serde_json::from_str(&json)?;
    assert_eq!(value["artist"][0]["albums"], serde_json::json!([]));
    Ok(())
}

#[test]
fn test_artist_include_expands_one_level() -> Result<()> {
    let config = config();
    let library = library();
    let renderer = Renderer::new(&config, &library)?;
    let includes = IncludeSet::parse("albums,songs")?;

    let xml = renderer.artists(&[1], &includes, &context(Format::default()))?;
    check_well_formed(&xml)?;
    assert!(xml.contains("    <albums>\n      <album id=\"10\">"));
    // the nested album is not expanded further
    assert!(xml.contains("<tracks></tracks>"));
    assert_eq!(xml.matches("<song id=").count(), 3);
    // duplicate tag ids collapse to one genre
    assert_eq!(xml.matches("<genre id=\"4\">").count(), 1);
    Ok(())
}

fn xml_error_schema(xml: &str) -> Result<Vec<String>> {
    let mut reader = Reader::from_str(xml);
    let mut names = Vec::new();
    let mut inside = false;
    loop {
        match reader.read_event()? {
            Event::Start(start) if start.name().as_ref() == b"error" => {
                inside = true;
                for attribute in start.attributes() {
                    names.push(String::from_utf8(attribute?.key.as_ref().to_vec())?);
                }
            }
            Event::Start(start) if inside => {
                names.push(String::from_utf8(start.name().as_ref().to_vec())?);
            }
            Event::End(end) if end.name().as_ref() == b"error" => inside = false,
            Event::Eof => break,
            _ => {}
        }
    }
    names.sort();
    Ok(names)
}

#[test]
fn test_error_schema_matches_across_formats() -> Result<()> {
    let config = config();
    let assembler = DocumentAssembler::new(&config, generated_at());

    let json = assembler.error("404", "X", "Y", Format::Json);
    let value: serde_json::Value = serde_json::from_str(&json)?;
    let error = value["error"].as_object().ok_or("missing error object")?;
    let mut json_keys: Vec<String> = error.keys().cloned().collect();
    json_keys.sort();
    assert_eq!(value.as_object().map(|o| o.len()), Some(1));
    assert_eq!(error["errorCode"], "404");
    assert_eq!(error["errorMessage"], "X");
    assert_eq!(error["errorAction"], "Y");

    let xml = assembler.error("404", "X", "Y", Format::default());
    check_well_formed(&xml)?;
    assert_eq!(xml_error_schema(&xml)?, json_keys);
    assert_eq!(json_keys, ["errorAction", "errorCode", "errorMessage"]);
    Ok(())
}

#[test]
fn test_every_kind_renders_in_indexes() -> Result<()> {
    let config = config();
    let library = library();
    let renderer = Renderer::new(&config, &library)?;
    let ids = |kind: EntityKind| -> Vec<u64> {
        match kind {
            EntityKind::Artist => vec![1, 2],
            EntityKind::Album => vec![10],
            EntityKind::Song => vec![101, 102, 103],
            EntityKind::Playlist => vec![4],
            EntityKind::SmartPlaylist => vec![3],
            EntityKind::Podcast => vec![9],
            EntityKind::PodcastEpisode => vec![90],
            EntityKind::Video => vec![30],
            EntityKind::Share => vec![40],
            EntityKind::Label => vec![50],
            EntityKind::LiveStream => vec![60],
            EntityKind::User => vec![7],
        }
    };

    for kind in EntityKind::ALL {
        let ids = ids(kind);
        let xml = renderer.indexes(kind, &ids, &IncludeSet::none(), &context(Format::default()))?;
        check_well_formed(&xml)?;
        let element = format!("<{} id=", cadence_api::element_name(kind));
        assert_eq!(xml.matches(element.as_str()).count(), ids.len(), "{}", kind);

        let full = renderer.render(kind, &ids, &IncludeSet::none(), &context(Format::Json))?;
        let value: serde_json::Value = serde_json::from_str(&full)?;
        assert!(value[cadence_api::element_name(kind)].is_array(), "{}", kind);
    }
    Ok(())
}

#[test]
fn test_artist_index_is_compact() -> Result<()> {
    let config = config();
    let library = library();
    let renderer = Renderer::new(&config, &library)?;

    let xml = renderer.indexes(EntityKind::Artist, &[1], &IncludeSet::none(), &context(Format::default()))?;
    assert!(xml.contains("<album id=\"10\"><![CDATA[Geogaddi]]></album>"));
    assert!(!xml.contains("<albumcount>"));
    Ok(())
}

#[test]
fn test_playlist_tracks_listing() -> Result<()> {
    let config = config();
    let library = library();
    let renderer = Renderer::new(&config, &library)?;
    let includes = IncludeSet::parse("tracks")?;

    let xml = renderer.playlists(&[PlaylistRef::Real(4)], &includes, &context(Format::default()))?;
    assert!(xml.contains(
        "<tracks>\n      <playlisttrack id=\"102\">1</playlisttrack>\n      <playlisttrack id=\"101\">2</playlisttrack>\n    </tracks>"
    ));
    Ok(())
}

#[test]
fn test_podcast_feed_for_album() -> Result<()> {
    let config = config();
    let library = library();
    let renderer = Renderer::new(&config, &library)?;
    let album = cadence_model::Catalog::album(&library, 10).ok_or("missing album")?;

    let feed = renderer.podcast_feed(&album, &context(Format::default()))?;
    check_well_formed(&feed)?;
    assert!(feed.contains("<title>Geogaddi Podcast</title>"));
    assert!(feed.contains("<itunes:image href="));
    assert_eq!(feed.matches("<item>").count(), 3);
    assert!(!feed.contains("<itunes:owner>"));
    Ok(())
}

#[test]
fn test_renders_in_parallel() -> Result<()> {
    let config = config();
    let library = library();
    let renderer = Renderer::new(&config, &library)?;
    let ctx = context(Format::Json).with_user(7);
    let expected = renderer.songs(&[101, 102, 103], &ctx)?;

    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let renderer = &renderer;
                let ctx = if i % 2 == 0 {
                    ctx.clone()
                } else {
                    ctx.clone().with_window(1, 1)
                };
                scope.spawn(move || renderer.songs(&[101, 102, 103], &ctx).map(|doc| (i, doc)))
            })
            .collect();
        for handle in handles {
            let (i, document) = handle.join().expect("render thread panicked").expect("render failed");
            if i % 2 == 0 {
                assert_eq!(document, expected);
            } else {
                assert!(document.contains("\"id\": \"102\""));
                assert!(!document.contains("\"id\": \"101\""));
            }
        }
    });
    Ok(())
}

#[test]
fn test_api_v4_uses_tag_elements() -> Result<()> {
    let config = config();
    let library = library();
    let renderer = Renderer::new(&config, &library)?;
    let ctx = context(Format::default()).with_api_version(cadence_api::ApiVersion::V4);

    let xml = renderer.artists(&[1], &IncludeSet::none(), &ctx)?;
    assert!(xml.contains("<tag id=\"4\"><![CDATA[IDM]]></tag>"));
    assert!(!xml.contains("<genre"));
    Ok(())
}

#[test]
fn test_error_document_for_render_failure() -> Result<()> {
    let config = config();
    let library = library();
    let renderer = Renderer::new(&config, &library)?;
    let ctx: RenderContext = context(Format::Json);

    let err = renderer
        .podcasts(&[9], &IncludeSet::parse("songs")?, &ctx)
        .unwrap_err();
    let document = renderer.error_document(&err, "podcasts", &ctx);
    let value: serde_json::Value = serde_json::from_str(&document)?;
    assert_eq!(value["error"]["errorCode"], "400");
    assert_eq!(value["error"]["errorAction"], "podcasts");
    Ok(())
}

#[test]
fn test_democratic_queue_in_both_formats() -> Result<()> {
    let config = config();
    let library = library();
    let renderer = Renderer::new(&config, &library)?;

    let xml = renderer.democratic(&[102, 101], &context(Format::default()))?;
    check_well_formed(&xml)?;
    assert!(xml.contains("<vote>3</vote>"));
    assert!(xml.contains("<vote>0</vote>"));
    assert!(xml.contains("<averagerating>3</averagerating>"));
    assert!(xml.find("<song id=\"102\">") < xml.find("<song id=\"101\">"));

    let json = renderer.democratic(&[102, 101], &context(Format::Json).with_user(7))?;
    let value: serde_json::Value = serde_json::from_str(&json)?;
    assert_eq!(value["song"][0]["vote"], 3);
    assert_eq!(value["song"][1]["vote"], 0);
    assert_eq!(value["song"][0]["flag"], 1);
    Ok(())
}

#[test]
fn test_keyed_and_object_arrays_are_well_formed() -> Result<()> {
    let config = config();
    let assembler = DocumentAssembler::new(&config, generated_at());
    let tree = [
        KeyedEntry::text("server", "Cadence"),
        KeyedEntry::nested(
            "catalog",
            vec![KeyedEntry::text("BPM\u{B2}", "x\u{0}y"), KeyedEntry::nested("7 inch", Vec::new())],
        ),
    ];

    let xml = assembler.keyed_array(&tree, Format::default());
    check_well_formed(&xml)?;
    assert!(xml.contains("<BPM_><![CDATA[xy]]></BPM_>"));
    assert!(xml.contains("<_7_inch></_7_inch>"));

    let json = assembler.keyed_array(&tree, Format::Json);
    let value: serde_json::Value = serde_json::from_str(&json)?;
    assert_eq!(value["catalog"]["BPM_"], "xy");

    let rows = vec![vec![("id", "9"), ("title", "End]]>"), ("time", "120")]];
    let xml = assembler.object_array("song", &rows, Format::default());
    check_well_formed(&xml)?;
    assert!(xml.contains("<song id=\"9\">"));
    assert!(xml.contains("<time>120</time>"));
    Ok(())
}

#[test]
fn test_labels_render_under_label_element() -> Result<()> {
    let config = config();
    let library = library();
    let renderer = Renderer::new(&config, &library)?;

    let xml = renderer.labels(&[50], &context(Format::default()))?;
    assert!(xml.contains("<label id=\"50\">"));
    assert!(!xml.contains("<license"));

    let json = renderer.labels(&[50], &context(Format::Json))?;
    let value: serde_json::Value = serde_json::from_str(&json)?;
    assert_eq!(value["label"][0]["name"], "Warp");
    assert!(value.get("license").is_none());
    Ok(())
}
