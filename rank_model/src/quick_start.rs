/*!

# Quick start

This example builds a small site to help choosing a piece of furniture.

Create a spreadsheet with the following content, and save it as `furniture.xlsx`
(or `furniture.csv`, the format does not matter):

| Data type: |               |
|------------|---------------|
| color      | str list      |
| legs       | int           |
|            |               |
| **Order:** |               |
| size       | small, medium, large |
|            |               |
| **Data:**  |               |               |       |
| name       | color         | size          | legs  |
| table      | red, blue     | large         | 4     |
| stool      | red           | small         | 3     |
| bench      | green         | large         | 4     |
| chair      | blue          | medium        | 4     |

Check that the model reads as expected:

```bash
rankgen info --data furniture.xlsx
```

```text
[2022-11-02T10:12:01Z INFO  rank_model] load_model: 4 answers, 3 characteristics, 0 details, 108 possible pages
name | color | size | legs
table | blue, red | large | 4
stool | red | small | 3
bench | green | large | 4
chair | blue | medium | 4

color: 3 values: blue, green, red
size: 3 values: small, medium, large
legs: 2 values: 3, 4
total count: 108
```

The total count is the number of pages a site would need to list every
sequence of choices. The generated site computes them in the browser instead.

Try a few selections from the command line:

```bash
rankgen navigate --data furniture.xlsx --select size=small --select legs=4
```

```text
 83% chair
 67% table
 67% bench
color: blue (2), green (1), red (1)
```

The stool has 3 legs: it is filtered out. The chair is the closest to a small
piece of furniture among the remaining ones. Size and legs are pinned to a
single value, so only the colors are offered.

Generate the site:

```bash
rankgen generate --data furniture.xlsx --outdir site/
```

Open `site/index.html` in a browser. Nothing else is needed: the pages are
static and the navigation runs in the page.

The same model can be built in code with the [crate::builder::Builder].

*/
